use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::{LabelMatching, LoadOptions, Timestamp, store::DEFAULT_CAPACITY};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub sensors: SensorArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer energy queries over TCP.
    #[clap(name = "serve")]
    Serve(ServeArgs),

    /// Answer a single query and print the response.
    #[clap(name = "query")]
    Query(QueryArgs),

    /// Print a summary of the loaded samples.
    #[clap(name = "inspect")]
    Inspect,
}

#[derive(Parser)]
pub struct SensorArgs {
    /// Sensor data file.
    #[clap(long = "sensors-path", default_value = "sensors.json", env = "SENSORS_PATH")]
    pub path: PathBuf,

    /// Loading fails when the file holds more samples than this.
    #[clap(long = "max-sample-count", default_value_t = DEFAULT_CAPACITY, env = "MAX_SAMPLE_COUNT")]
    pub capacity: usize,

    #[clap(long, value_enum, default_value = "exact", env = "LABEL_MATCHING")]
    pub label_matching: LabelMatching,
}

impl SensorArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::builder()
            .capacity(self.capacity)
            .label_matching(self.label_matching)
            .build()
    }
}

#[derive(Parser)]
pub struct ServeArgs {
    #[clap(long, default_value = "0.0.0.0:8080", env = "BIND_ADDRESS")]
    pub bind_address: String,

    /// Requests are read with a single read of at most this many bytes.
    #[clap(long, default_value = "1024", env = "RECEIVE_BUFFER_SIZE")]
    pub receive_buffer_size: usize,
}

#[derive(Parser)]
pub struct QueryArgs {
    /// Range start, in seconds.
    #[clap(long, allow_hyphen_values = true)]
    pub start: Timestamp,

    /// Range end, in seconds.
    #[clap(long, allow_hyphen_values = true)]
    pub end: Timestamp,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_verify_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_query() {
        let args = Args::parse_from([
            "sensor-energy",
            "--sensors-path",
            "data.json",
            "--label-matching",
            "substring",
            "query",
            "--start",
            "-5",
            "--end",
            "10",
        ]);
        assert_eq!(args.sensors.path, PathBuf::from("data.json"));
        assert_eq!(args.sensors.label_matching, LabelMatching::Substring);
        let Command::Query(query) = args.command else {
            panic!("expected the query command");
        };
        assert_eq!(query.start, Timestamp(-5));
        assert_eq!(query.end, Timestamp(10));
    }
}
