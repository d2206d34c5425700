use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::Result, trace::DecisionTrace};

/// The renderer-facing output of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPlan {
    /// Clips in ascending start order
    pub clips: Vec<Clip>,

    pub metadata: PlanMetadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,

    /// Final trace of every candidate segment, selected or not
    pub decision_trace: BTreeMap<String, DecisionTrace>,
}

impl EditPlan {
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Sum of clip durations
    pub fn clip_duration(&self) -> f64 {
        self.clips.iter().map(Clip::duration).sum()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the plan as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

/// One output clip, mapped 1:1 from a selected segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub source_id: String,

    /// Start within the source, seconds
    pub start: f64,

    /// End within the source, seconds
    pub end: f64,

    pub volume: f64,

    /// Transition into the next clip; absent on the last clip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_after: Option<Transition>,
}

impl Clip {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub kind: TransitionKind,

    /// Seconds; zero for cuts
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Cut,
    Fade,
    Dissolve,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cut => write!(f, "cut"),
            Self::Fade => write!(f, "fade"),
            Self::Dissolve => write!(f, "dissolve"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetadata {
    /// Equals the sum of clip durations
    pub total_duration: f64,
    pub fps: f64,
    pub resolution: Resolution,
}

/// Output frame size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// References to branding assets; the renderer resolves them
///
/// Read from `[output.branding]` in TOML, hence the snake_case alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outro: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<String>,

    #[serde(
        default,
        rename = "backgroundMusic",
        alias = "background_music",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_music: Option<String>,
}

impl Branding {
    pub fn is_empty(&self) -> bool {
        self.intro.is_none() && self.outro.is_none() && self.watermark.is_none() && self.background_music.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn plan() -> EditPlan {
        let mut decision_trace = BTreeMap::new();
        decision_trace.insert("a-0001".to_string(), DecisionTrace::new().with_weight("base", 50.0));

        EditPlan {
            clips: vec![
                Clip {
                    source_id: "a".to_string(),
                    start: 0.0,
                    end: 4.0,
                    volume: 1.0,
                    transition_after: Some(Transition {
                        kind: TransitionKind::Fade,
                        duration: 0.5,
                    }),
                },
                Clip {
                    source_id: "a".to_string(),
                    start: 6.0,
                    end: 8.0,
                    volume: 1.0,
                    transition_after: None,
                },
            ],
            metadata: PlanMetadata {
                total_duration: 6.0,
                fps: 30.0,
                resolution: Resolution::default(),
            },
            branding: None,
            decision_trace,
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = plan().to_json_pretty().unwrap();

        assert!(json.contains("\"sourceId\""));
        assert!(json.contains("\"transitionAfter\""));
        assert!(json.contains("\"decisionTrace\""));
        assert!(json.contains("\"totalDuration\""));
        assert!(json.contains("\"kind\": \"fade\""));
        assert!(!json.contains("\"branding\""));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let plan = plan();

        plan.save_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: EditPlan = serde_json::from_str(&content).unwrap();

        assert_eq!(loaded, plan);
        assert_eq!(loaded.clip_duration(), 6.0);
    }

    #[test]
    fn test_branding_is_empty() {
        assert!(Branding::default().is_empty());

        let branding = Branding {
            watermark: Some("logo.png".to_string()),
            ..Branding::default()
        };
        assert!(!branding.is_empty());
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::default().to_string(), "1920x1080");
    }
}
