//! Test data builders for creating recordings

use super::seconds;
use acti_labeler::{Sample, SampleTable};

/// Builder for one-sample-per-second recordings
pub struct RecordingBuilder {
    name: String,
    vm: Vec<f64>,
    spacing: i64,
}

impl RecordingBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vm: Vec::new(),
            spacing: 1,
        }
    }

    pub fn vm(mut self, values: &[f64]) -> Self {
        self.vm = values.to_vec();
        self
    }

    /// Seconds between consecutive samples
    pub fn spacing(mut self, secs: i64) -> Self {
        self.spacing = secs;
        self
    }

    fn samples(&self) -> Vec<Sample> {
        self.vm
            .iter()
            .enumerate()
            .map(|(i, &vm)| Sample::new(seconds(i as i64 * self.spacing), 1.0, 2.0, 3.0, vm))
            .collect()
    }

    /// CSV text with a `timestamp` column
    pub fn csv(&self) -> String {
        let mut out = String::from("timestamp,axis1,axis2,axis3,vm\n");
        for s in self.samples() {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                s.timestamp.format("%Y-%m-%d %H:%M:%S"),
                s.axis1,
                s.axis2,
                s.axis3,
                s.vm
            ));
        }
        out
    }

    pub fn build(self) -> SampleTable {
        let samples = self.samples();
        SampleTable::from_samples(samples, self.name).expect("builder needs at least one sample")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_builder() {
        let table = RecordingBuilder::new("p.csv").vm(&[1.0, 2.0, 3.0]).spacing(30).build();
        assert_eq!(table.len(), 3);
        assert_eq!(table.bounds(), (seconds(0), seconds(60)));
    }
}
