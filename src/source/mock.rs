//! Scripted source for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{MetricsSource, Snapshot, SourceError, parse_exposition};

/// Replays a fixed sequence of fetch results, then keeps returning the last
/// one.
#[derive(Debug)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Snapshot, SourceError>>>,
    last: Mutex<Option<Result<Snapshot, SourceError>>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Snapshot, SourceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
        }
    }

    /// Builds a script from exposition payloads, one per fetch.
    pub fn from_exposition(payloads: &[&str]) -> Result<Self, SourceError> {
        let script = payloads
            .iter()
            .map(|p| parse_exposition(p).map_err(SourceError::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(script.into_iter().map(Ok).collect()))
    }
}

impl MetricsSource for ScriptedSource {
    fn fetch(&self) -> Result<Snapshot, SourceError> {
        let next = self
            .script
            .lock()
            .map_err(|_| SourceError::Http("script lock poisoned".to_string()))?
            .pop_front();
        let mut last = self
            .last
            .lock()
            .map_err(|_| SourceError::Http("script lock poisoned".to_string()))?;
        match next {
            Some(result) => {
                *last = Some(result.clone());
                result
            }
            None => last.clone().unwrap_or_else(|| Ok(Vec::new())),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_source_replays_then_repeats() {
        let source = ScriptedSource::from_exposition(&["a 1", "a 2"]).unwrap();
        assert_eq!(source.fetch().unwrap()[0].value, 1.0);
        assert_eq!(source.fetch().unwrap()[0].value, 2.0);
        assert_eq!(source.fetch().unwrap()[0].value, 2.0);
    }

    #[test]
    fn test_scripted_source_errors() {
        let source = ScriptedSource::new(vec![Err(SourceError::Http("boom".into()))]);
        assert_eq!(source.fetch(), Err(SourceError::Http("boom".into())));
    }

    #[test]
    fn test_empty_script_yields_empty_snapshot() {
        let source = ScriptedSource::new(Vec::new());
        assert!(source.fetch().unwrap().is_empty());
    }
}
