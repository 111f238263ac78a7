//! Named parameter presets and JSON preset files.

use std::fs;
use std::path::Path;

use crate::{config::GalaxyParams, error::PresetError, types::Rgb};

#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub params: GalaxyParams,
}

/// Built-in presets, the first one being the defaults.
pub fn presets() -> Vec<Preset> {
    let base = GalaxyParams::default();
    vec![
        Preset {
            name: "Classic",
            description: "Three loosely wound arms, warm core fading to blue",
            params: base,
        },
        Preset {
            name: "Tight spiral",
            description: "Strong twist with particles hugging the arms",
            params: GalaxyParams {
                branches: 4,
                spin: 3.0,
                randomness: 0.15,
                randomness_power: 6.0,
                ..base
            },
        },
        Preset {
            name: "Wide arms",
            description: "Two sweeping arms with heavy scatter",
            params: GalaxyParams {
                count: 200_000,
                radius: 8.0,
                branches: 2,
                spin: -0.8,
                randomness: 0.6,
                randomness_power: 2.0,
                inside_color: Rgb::new(1.0, 0.85, 0.55),
                outside_color: Rgb::new(0.35, 0.1, 0.6),
                ..base
            },
        },
        Preset {
            name: "Ring",
            description: "Many untwisted arms forming a pinwheel disk",
            params: GalaxyParams {
                branches: 16,
                spin: 0.0,
                randomness: 0.4,
                randomness_power: 4.0,
                inside_color: Rgb::WHITE,
                outside_color: Rgb::new(0.2, 0.6, 1.0),
                ..base
            },
        },
    ]
}

/// Looks up a built-in preset by name, ignoring ASCII case.
pub fn find(name: &str) -> Option<Preset> {
    presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

impl GalaxyParams {
    pub fn to_json(&self) -> Result<String, PresetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates parameters from JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        let params: GalaxyParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Saves the parameters to a pretty-printed JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PresetError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| PresetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads and validates parameters from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PresetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParamError;

    #[test]
    fn builtin_presets_are_valid_and_uniquely_named() {
        let all = presets();
        assert_eq!(all[0].params, GalaxyParams::default());
        for (i, p) in all.iter().enumerate() {
            assert_eq!(p.params.validate(), Ok(()), "preset {}", p.name);
            assert!(all[i + 1..].iter().all(|q| q.name != p.name));
        }
    }

    #[test]
    fn find_ignores_case() {
        assert_eq!(find("tight SPIRAL").unwrap().name, "Tight spiral");
        assert!(find("nebula").is_none());
    }

    #[test]
    fn json_keeps_every_field() {
        let params = find("Wide arms").unwrap().params;
        let json = params.to_json().unwrap();
        assert!(json.contains("\"randomness_power\""));
        assert_eq!(GalaxyParams::from_json(&json).unwrap(), params);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params = GalaxyParams::from_json(r#"{ "count": 500, "spin": -2.0 }"#).unwrap();
        assert_eq!(params.count, 500);
        assert_eq!(params.spin, -2.0);
        assert_eq!(params.radius, GalaxyParams::default().radius);
    }

    #[test]
    fn invalid_json_values_are_rejected() {
        let err = GalaxyParams::from_json(r#"{ "branches": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            PresetError::Invalid(ParamError::OutOfRange { .. })
        ));

        let err = GalaxyParams::from_json("{ not json").unwrap_err();
        assert!(matches!(err, PresetError::Json(_)));
    }

    #[test]
    fn save_and_load_through_a_file() {
        let path = std::env::temp_dir().join(format!(
            "galaxy-preset-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let params = find("Ring").unwrap().params;

        params.save(&path).unwrap();
        let loaded = GalaxyParams::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, params);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let path = std::env::temp_dir().join("galaxy-preset-does-not-exist.json");
        match GalaxyParams::load(&path) {
            Err(PresetError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
