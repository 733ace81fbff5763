use crate::storage::StorageConfig;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

pub fn args_checks() -> Args {
    Args::parse()
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and update the pipeline's object storage", long_about = None)]
pub struct Args {
    /// Print extra stuff, repeat for debug output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// S3-compatible endpoint, defaults to the pipeline's Backblaze endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    /// Address buckets as https://endpoint/bucket instead of https://bucket.endpoint
    #[arg(long)]
    pub path_style: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Exit 0 if any key starts with PREFIX, 1 otherwise
    Exists { bucket: String, prefix: String },
    /// List objects under PREFIX
    Ls {
        bucket: String,
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Print an object's content
    Cat {
        bucket: String,
        key: String,
        /// Write the undecoded bytes
        #[arg(long)]
        raw: bool,
    },
    /// Create a folder marker object
    Mkdir { bucket: String, name: String },
    /// Upload a local file
    Put {
        bucket: String,
        #[arg(value_parser = check_readable_file)]
        from: PathBuf,
        to: String,
        /// Keep the local file after a successful upload
        #[arg(long)]
        keep: bool,
    },
    /// Show the first rows of a CSV object
    Csv {
        bucket: String,
        key: String,
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
}

impl Args {
    /// Validate option combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.endpoint_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(format!(
                    "--endpoint-url must start with http:// or https://, got '{url}'"
                ));
            }
        }
        if let Command::Csv { rows: 0, .. } = self.command {
            return Err("--rows must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn storage_config(&self) -> StorageConfig {
        let mut config = StorageConfig::default().with_path_style(self.path_style);
        if let Some(url) = &self.endpoint_url {
            config = config.with_endpoint(url.clone());
        }
        if let Some(region) = &self.region {
            config = config.with_region(region.clone());
        }
        config
    }
}

fn check_readable_file(file: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(file);
    if path.is_file() && fs::metadata(&path).is_ok() {
        Ok(path)
    } else {
        Err(format!("The file '{}' is not readable.", file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommand_and_verbosity() {
        let args = Args::try_parse_from([
            "pipeline-storage",
            "-vv",
            "--path-style",
            "exists",
            "Wanted-SG-Bucket",
            "model-registry/",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(
            args.command,
            Command::Exists {
                bucket: "Wanted-SG-Bucket".to_string(),
                prefix: "model-registry/".to_string()
            }
        );
        assert!(args.storage_config().force_path_style);
    }

    #[test]
    fn overrides_land_in_the_config() {
        let args = Args::try_parse_from([
            "pipeline-storage",
            "--endpoint-url",
            "http://localhost:9000",
            "--region",
            "us-east-1",
            "ls",
            "bucket",
        ])
        .unwrap();
        let config = args.storage_config();
        assert_eq!(config.endpoint_url, "http://localhost:9000");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(
            args.command,
            Command::Ls {
                bucket: "bucket".to_string(),
                prefix: String::new()
            }
        );
    }

    #[test]
    fn put_requires_a_readable_file() {
        let result = Args::try_parse_from([
            "pipeline-storage",
            "put",
            "bucket",
            "/definitely/not/here.csv",
            "data.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_zero_rows() {
        let args =
            Args::try_parse_from(["pipeline-storage", "csv", "bucket", "train.csv", "--rows", "0"])
                .unwrap();
        assert!(args.validate().is_err());
    }
}
