//! Name → implementation lookup for processors and formatters.
//!
//! A [`Registry`] is built once at startup and handed to whatever composes
//! the run (the CLI, a test, an embedding application). There is no global
//! registry.
//!
//! # Example
//!
//! ```rust
//! use email_scraper::registry::Registry;
//!
//! let registry = Registry::with_defaults();
//! assert!(registry.processor("classifier").is_ok());
//! assert!(registry.formatter("json").is_ok());
//! assert!(registry.formatter("xml").is_err());
//! ```

use crate::core::{Classifier, Processor, StatisticsProcessor};
use crate::error::{Result, ScraperError};
use crate::format::{Formatter, JsonFormatter};

/// Registered processors and formatters, in registration order.
#[derive(Default)]
pub struct Registry {
    processors: Vec<Box<dyn Processor>>,
    formatters: Vec<Box<dyn Formatter>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in processor and formatter.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_processor(StatisticsProcessor::new());
        registry.register_processor(Classifier::new());

        registry.register_formatter(JsonFormatter);
        #[cfg(feature = "csv-output")]
        registry.register_formatter(crate::format::CsvFormatter);
        #[cfg(feature = "yaml-output")]
        registry.register_formatter(crate::format::YamlFormatter);

        registry
    }

    /// Adds a processor, replacing any with the same name in place.
    pub fn register_processor(&mut self, processor: impl Processor + 'static) {
        let boxed: Box<dyn Processor> = Box::new(processor);
        match self.processors.iter_mut().find(|p| p.name() == boxed.name()) {
            Some(slot) => *slot = boxed,
            None => self.processors.push(boxed),
        }
    }

    /// Adds a formatter, replacing any with the same name in place.
    pub fn register_formatter(&mut self, formatter: impl Formatter + 'static) {
        let boxed: Box<dyn Formatter> = Box::new(formatter);
        match self.formatters.iter_mut().find(|f| f.name() == boxed.name()) {
            Some(slot) => *slot = boxed,
            None => self.formatters.push(boxed),
        }
    }

    pub fn processor(&self, name: &str) -> Result<&dyn Processor> {
        self.processors
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
            .ok_or_else(|| ScraperError::UnknownProcessor {
                name: name.to_string(),
                known: self.processor_names().map(String::from).collect(),
            })
    }

    /// Looks up several processors, keeping the requested order.
    pub fn processors<'a, I>(&self, names: I) -> Result<Vec<&dyn Processor>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().map(|name| self.processor(name)).collect()
    }

    pub fn formatter(&self, name: &str) -> Result<&dyn Formatter> {
        self.formatters
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
            .ok_or_else(|| ScraperError::UnknownFormat {
                name: name.to_string(),
                known: self.formatter_names().map(String::from).collect(),
            })
    }

    pub fn processor_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.processors.iter().map(|p| p.name())
    }

    pub fn formatter_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formatters.iter().map(|f| f.name())
    }

    /// `(name, description)` of every processor, in registration order.
    pub fn list_processors(&self) -> Vec<(&'static str, &'static str)> {
        self.processors
            .iter()
            .map(|p| (p.name(), p.description()))
            .collect()
    }

    /// `(name, description)` of every formatter, in registration order.
    pub fn list_formatters(&self) -> Vec<(&'static str, &'static str)> {
        self.formatters
            .iter()
            .map(|f| (f.name(), f.description()))
            .collect()
    }
}
