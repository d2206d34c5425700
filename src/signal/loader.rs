use std::path::Path;

use tracing::debug;

use crate::error::{Result, SignalError};
use crate::signal::types::RawSignal;

/// Loads signal data produced by the upstream extractor
pub struct SignalLoader;

impl SignalLoader {
    /// Load and validate a JSON signal file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<RawSignal> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| SignalError::LoadFailed {
                path: path.display().to_string(),
            })?;

        let signal = Self::from_json_str(&content, &path.display().to_string())?;

        debug!(
            "Loaded signal '{}' from {:?}: {:.1}s, {} energy samples, {} speech intervals, {} scene changes",
            signal.source_id,
            path,
            signal.total_duration,
            signal.audio.len(),
            signal.speech.len(),
            signal.scene_changes.len()
        );

        Ok(signal)
    }

    /// Load several signal files, in order, failing on the first error
    pub async fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RawSignal>> {
        let mut signals = Vec::with_capacity(paths.len());
        for path in paths {
            signals.push(Self::load(path).await?);
        }
        Ok(signals)
    }

    /// Parse and validate a signal from JSON text; `origin` names the source in errors
    pub fn from_json_str(content: &str, origin: &str) -> Result<RawSignal> {
        let signal: RawSignal = serde_json::from_str(content)
            .map_err(|e| SignalError::ParseFailed {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;

        signal.validate()?;
        Ok(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DirectorError;
    use tempfile::tempdir;

    const SIGNAL_JSON: &str = r#"{
        "sourceId": "match-01",
        "totalDuration": 12.5,
        "audio": { "timestamps": [0.0, 5.0, 10.0], "energy": [0.2, 0.7, 0.05] },
        "speech": [{ "start": 1.0, "end": 3.0, "text": "What a goal" }],
        "sceneChanges": [4.0, 9.5]
    }"#;

    #[test]
    fn test_parse_signal_json() {
        let signal = SignalLoader::from_json_str(SIGNAL_JSON, "inline").unwrap();
        assert_eq!(signal.source_id, "match-01");
        assert_eq!(signal.audio.len(), 3);
        assert_eq!(signal.speech[0].text.as_deref(), Some("What a goal"));
        assert_eq!(signal.scene_changes, vec![4.0, 9.5]);
    }

    #[test]
    fn test_optional_sections_default() {
        let signal = SignalLoader::from_json_str(r#"{"sourceId": "x", "totalDuration": 3.0}"#, "inline").unwrap();
        assert!(signal.audio.is_empty());
        assert!(signal.speech.is_empty());
        assert!(signal.scene_changes.is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = SignalLoader::from_json_str("{ not json", "broken.json");
        assert!(matches!(
            result,
            Err(DirectorError::Signal(SignalError::ParseFailed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("signal.json");
        std::fs::write(&path, SIGNAL_JSON).unwrap();

        let signal = SignalLoader::load(&path).await.unwrap();
        assert_eq!(signal.total_duration, 12.5);

        let all = SignalLoader::load_all(&[&path, &path]).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_recoverable_load_error() {
        let dir = tempdir().unwrap();
        let err = SignalLoader::load(dir.path().join("missing.json")).await.unwrap_err();
        assert!(err.is_recoverable());
    }
}
