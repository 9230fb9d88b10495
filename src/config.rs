use std::path::{Path, PathBuf};

use yaml_rust::Yaml;
use yaml_rust::YamlLoader;

use super::config_utils;
use super::errors::{PlanError, PlanResult};


/// Where a planning run reads its instance from and writes its results to.
#[derive(PartialEq, Debug, Clone)]
pub struct PlanConfig {
    pub vehicles_path: PathBuf,
    pub requests_path: PathBuf,
    pub edges_path: PathBuf,
    pub mapping_path: Option<PathBuf>,
    pub solution_path: PathBuf,
    pub requests_out_path: PathBuf,
    pub routes_out_path: Option<PathBuf>,
    /// compute the shortest paths of all likely leg origins up front, in parallel
    pub parallel_warmup: bool,
}

impl PlanConfig {
    /// Loads a config file.  Relative paths in it are taken relative to the file's directory.
    pub fn from_file(path: &Path) -> PlanResult<PlanConfig> {
        let file_contents = std::fs::read_to_string(path)
            .map_err(|err| PlanError::io(path, err))?;
        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        PlanConfig::from_yaml_str(&file_contents, config_dir)
    }

    pub fn from_yaml_str(contents: &str, config_dir: &Path) -> PlanResult<PlanConfig> {
        let yaml_cfgs = YamlLoader::load_from_str(contents)
            .map_err(|err| PlanError::Config(format!("not valid yaml: {}", err)))?;
        let yaml_cfg = yaml_cfgs.get(0)
            .ok_or_else(|| PlanError::Config(String::from("config is empty")))?;

        let required_path = |key: &str| -> PlanResult<PathBuf> {
            match optional_path(yaml_cfg, key, config_dir)? {
                Some(path) => Ok(path),
                None => Err(PlanError::Config(format!("no {}", key))),
            }
        };

        let parallel_warmup = match &yaml_cfg["parallel_warmup"] {
            Yaml::BadValue | Yaml::Null => false,
            Yaml::Boolean(flag) => *flag,
            _ => return Err(PlanError::Config(String::from("parallel_warmup must be a bool"))),
        };

        Ok(PlanConfig {
            vehicles_path: required_path("vehicles_path")?,
            requests_path: required_path("requests_path")?,
            edges_path: required_path("edges_path")?,
            mapping_path: optional_path(yaml_cfg, "mapping_path", config_dir)?,
            solution_path: required_path("solution_path")?,
            requests_out_path: required_path("requests_out_path")?,
            routes_out_path: optional_path(yaml_cfg, "routes_out_path", config_dir)?,
            parallel_warmup,
        })
    }
}

fn optional_path(yaml_cfg: &Yaml, key: &str, config_dir: &Path) -> PlanResult<Option<PathBuf>> {
    match &yaml_cfg[key] {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::String(path) => Ok(Some(config_utils::str_to_absolute_path(path, config_dir))),
        _ => Err(PlanError::Config(format!("{} must be a path", key))),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_file;
    use tempfile::tempdir;

    static FULL_CONFIG: &str = r###"
vehicles_path: vehicles.txt
requests_path: requests.txt
edges_path: /data/edges.txt
mapping_path: mapping.txt
solution_path: out/solution.txt
requests_out_path: out/requests.txt
routes_out_path: out/routes.txt
parallel_warmup: true
"###;

    #[test]
    fn test_full_config() {
        let cfg = PlanConfig::from_yaml_str(FULL_CONFIG, Path::new("/runs/a")).unwrap();
        assert_eq!(cfg.vehicles_path, PathBuf::from("/runs/a/vehicles.txt"));
        assert_eq!(cfg.edges_path, PathBuf::from("/data/edges.txt"));
        assert_eq!(cfg.mapping_path, Some(PathBuf::from("/runs/a/mapping.txt")));
        assert_eq!(cfg.requests_out_path, PathBuf::from("/runs/a/out/requests.txt"));
        assert_eq!(cfg.routes_out_path, Some(PathBuf::from("/runs/a/out/routes.txt")));
        assert!(cfg.parallel_warmup);
    }

    #[test]
    fn test_optional_keys_default() {
        let yaml = "vehicles_path: v\nrequests_path: r\nedges_path: e\nsolution_path: s\n\
                    requests_out_path: ro\n";
        let cfg = PlanConfig::from_yaml_str(yaml, Path::new("/x")).unwrap();
        assert_eq!(cfg.mapping_path, None);
        assert_eq!(cfg.routes_out_path, None);
        assert!(! cfg.parallel_warmup);
    }

    #[test]
    fn test_missing_required_key() {
        let yaml = "vehicles_path: v\nrequests_path: r\nsolution_path: s\nrequests_out_path: ro\n";
        match PlanConfig::from_yaml_str(yaml, Path::new("/x")) {
            Err(PlanError::Config(msg)) => assert!(msg.contains("edges_path")),
            other => panic!("expected a config error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_values() {
        let yaml = "vehicles_path: [1, 2]\n";
        assert!(PlanConfig::from_yaml_str(yaml, Path::new("/x")).is_err());
        let yaml = "vehicles_path: v\nrequests_path: r\nedges_path: e\nsolution_path: s\n\
                    requests_out_path: ro\nparallel_warmup: sometimes\n";
        assert!(PlanConfig::from_yaml_str(yaml, Path::new("/x")).is_err());
        assert!(PlanConfig::from_yaml_str("", Path::new("/x")).is_err());
    }

    #[test]
    fn test_from_file_resolves_against_its_dir() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "config.yaml", FULL_CONFIG);
        let cfg = PlanConfig::from_file(&path).unwrap();
        assert_eq!(cfg.solution_path, dir.path().join("out/solution.txt"));
    }
}
