use std::{error, fmt};

use crate::LonLat;

/// The input to a boolean operation isn't a valid simple polygon. Callers validating noisy map
/// data usually want to skip the pair instead of aborting.
#[derive(Clone, PartialEq)]
pub struct TopologyError {
    message: String,
    context: Vec<String>,
}

impl TopologyError {
    pub fn new(message: String) -> TopologyError {
        TopologyError {
            message,
            context: Vec::new(),
        }
    }

    pub fn context(mut self, msg: String) -> TopologyError {
        self.context.push(msg);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for c in &self.context {
            write!(f, "\n  - {}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Do the same thing as the Display trait
        write!(f, "{}", self)
    }
}

impl error::Error for TopologyError {}

/// Some pieces couldn't be chained into closed rings. Lists every dangling endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenRings {
    pub open_locations: Vec<LonLat>,
}

impl fmt::Display for OpenRings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Rings are open at")?;
        for pt in &self.open_locations {
            write!(f, " {}", pt)?;
        }
        Ok(())
    }
}

impl error::Error for OpenRings {}
