use std::time::Duration;

pub trait DurationFormat {
    /// Render using the largest unit that is non-zero.
    fn log_str(&self) -> String;
}

impl DurationFormat for Duration {
    fn log_str(&self) -> String {
        match (self.as_secs(), self.as_millis(), self.as_micros()) {
            (s, _, _) if s > 0 => format!("{s}s"),
            (_, ms, _) if ms > 0 => format!("{ms}ms"),
            (_, _, us) if us > 0 => format!("{us}µs"),
            _ => format!("{}ns", self.as_nanos()),
        }
    }
}
