//! Export helpers for CSV tick traces and JSON snapshot sidecars.

pub mod trace {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use serde::Serialize;
    use ullage_sim::UllageSimulator;

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// One CSV row per simulated tick.
    #[derive(Debug, Clone, Serialize)]
    pub struct Record<'a> {
        pub time_s: f64,
        pub segment: &'a str,
        pub height_min: f64,
        pub height_max: f64,
        pub radial_min: f64,
        pub radial_max: f64,
        pub stability: f64,
        pub probability: f64,
        pub tier: &'a str,
    }

    impl<'a> Record<'a> {
        /// Capture the simulator's current state after a tick.
        pub fn capture(time_s: f64, segment: &'a str, sim: &UllageSimulator) -> Self {
            let bounds = sim.bounds();
            Self {
                time_s,
                segment,
                height_min: bounds.height_min,
                height_max: bounds.height_max,
                radial_min: bounds.radial_min,
                radial_max: bounds.radial_max,
                stability: sim.stability(),
                probability: sim.probability(),
                tier: sim.tier().english(),
            }
        }
    }

    /// CSV writer that emits the header before the first record.
    pub struct TraceWriter<W: Write> {
        inner: csv::Writer<W>,
        rows: usize,
    }

    impl<W: Write> TraceWriter<W> {
        pub fn new(writer: W) -> Self {
            Self {
                inner: csv::Writer::from_writer(writer),
                rows: 0,
            }
        }

        pub fn write(&mut self, record: &Record<'_>) -> io::Result<()> {
            self.inner.serialize(record)?;
            self.rows += 1;
            Ok(())
        }

        pub fn rows(&self) -> usize {
            self.rows
        }

        pub fn finish(mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }
}

pub mod snapshot {
    use std::fs::{self, File};
    use std::io::{self, BufReader, BufWriter};
    use std::path::Path;

    use serde_json::to_writer_pretty;
    use ullage_sim::Snapshot;

    /// Write the snapshot as a pretty-printed JSON object of string values.
    pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        to_writer_pretty(BufWriter::new(file), snapshot)?;
        Ok(())
    }

    pub fn read_snapshot(path: &Path) -> io::Result<Snapshot> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
