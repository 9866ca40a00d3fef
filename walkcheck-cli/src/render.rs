use std::{
    io::{self, Write},
    time::Instant,
};

use walkcheck_core::{Checklist, ErrorNotice, PresentationSink, WeatherReport, sink::ErrorBanner};

/// Sinks that write to a stream and remember the first write failure, since
/// [`PresentationSink`] methods cannot return one.
pub trait WriteStatus {
    fn take_io_error(&mut self) -> Option<io::Error>;
}

fn record(slot: &mut Option<io::Error>, result: io::Result<()>) {
    if let Err(err) = result {
        tracing::error!(error = %err, "failed to write output");
        slot.get_or_insert(err);
    }
}

/// Human-readable output: the report on `out`, progress and errors on `err`.
pub struct TerminalSink<O: Write, E: Write> {
    out: O,
    err: E,
    io_error: Option<io::Error>,
}

impl TerminalSink<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err, io_error: None }
    }

    pub fn print_checklist(&mut self, checklist: &Checklist) {
        let result = write_checklist(&mut self.out, checklist);
        record(&mut self.io_error, result);
    }

    fn write_report(&mut self, report: &WeatherReport) -> io::Result<()> {
        let d = &report.display;
        let rows = [
            (d.condition.as_str(), d.temp_label.as_str()),
            ("Feels like", d.feels_like_label.as_str()),
            ("Rain", d.rain_label.as_str()),
            ("Wind", d.wind_label.as_str()),
            ("Sunrise", d.sunrise_label.as_str()),
            ("Sunset", d.sunset_label.as_str()),
            ("Visibility", d.visibility_label.as_str()),
        ];

        writeln!(self.out, "{}", d.location_label)?;
        for (label, value) in rows {
            writeln!(self.out, "  {label:<12} {value}")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", report.advisory.message)?;
        writeln!(self.out)?;
        write_checklist(&mut self.out, &report.checklist)
    }

    #[cfg(test)]
    fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

fn write_checklist(out: &mut impl Write, checklist: &Checklist) -> io::Result<()> {
    writeln!(out, "Checklist:")?;
    for (i, entry) in checklist.entries().iter().enumerate() {
        let mark = if entry.checked { "x" } else { " " };
        writeln!(out, "  [{mark}] {:>2}. {}", i + 1, entry.label)?;
    }
    out.flush()
}

impl<O: Write, E: Write> WriteStatus for TerminalSink<O, E> {
    fn take_io_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }
}

impl<O: Write, E: Write> PresentationSink for TerminalSink<O, E> {
    fn show_loading(&mut self, city: &str) {
        let result = writeln!(self.err, "Loading weather data for {city}...");
        record(&mut self.io_error, result);
    }

    fn render(&mut self, report: &WeatherReport) {
        let result = self.write_report(report);
        record(&mut self.io_error, result);
    }

    fn show_error(&mut self, notice: &ErrorNotice) {
        let result = writeln!(self.err, "{}", notice.message);
        record(&mut self.io_error, result);
    }
}

/// Machine-readable output: the report as pretty JSON on `out`, errors on `err`.
pub struct JsonSink<O: Write, E: Write> {
    out: O,
    err: E,
    io_error: Option<io::Error>,
}

impl JsonSink<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self { out: io::stdout(), err: io::stderr(), io_error: None }
    }
}

impl<O: Write, E: Write> WriteStatus for JsonSink<O, E> {
    fn take_io_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }
}

impl<O: Write, E: Write> PresentationSink for JsonSink<O, E> {
    fn render(&mut self, report: &WeatherReport) {
        let result = serde_json::to_writer_pretty(&mut self.out, report)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(self.out));
        record(&mut self.io_error, result);
    }

    fn show_error(&mut self, notice: &ErrorNotice) {
        let result = writeln!(self.err, "{}", notice.message);
        record(&mut self.io_error, result);
    }
}

/// Sink for the interactive prompt. Reports go to the terminal; errors go to
/// the banner only, which the prompt shows as its help line.
pub struct InteractiveSink<'a, S> {
    inner: &'a mut S,
    banner: &'a mut ErrorBanner,
}

impl<'a, S: PresentationSink> InteractiveSink<'a, S> {
    pub fn new(inner: &'a mut S, banner: &'a mut ErrorBanner) -> Self {
        Self { inner, banner }
    }
}

impl<S: PresentationSink> PresentationSink for InteractiveSink<'_, S> {
    fn show_loading(&mut self, city: &str) {
        self.inner.show_loading(city);
    }

    fn render(&mut self, report: &WeatherReport) {
        self.banner.clear();
        self.inner.render(report);
    }

    fn show_error(&mut self, notice: &ErrorNotice) {
        self.banner.post(notice.clone(), Instant::now());
    }

    fn clear_error(&mut self) {
        self.banner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkcheck_core::Observation;

    fn snowy_report() -> WeatherReport {
        WeatherReport::from_observation(&Observation {
            temperature_c: -5.0,
            feels_like_c: -9.3,
            wind_speed_ms: 3.0,
            reported_wind_kph: None,
            precipitation_mm: 0.0,
            sky_condition: "snow".to_string(),
            description: "light snow".to_string(),
            visibility_m: Some(0.0),
            sunrise_epoch_utc: 1_705_321_800,
            sunset_epoch_utc: 1_705_354_200,
            utc_offset_seconds: -18_000,
            location_label: "Montreal, CA".to_string(),
        })
    }

    /// Writer whose every write fails, like a closed pipe.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn render_writes_report_to_out_only() {
        let mut sink = TerminalSink::new(Vec::new(), Vec::new());
        sink.render(&snowy_report());
        assert!(sink.take_io_error().is_none());

        let (out, err) = sink.into_parts();
        let out = String::from_utf8(out).expect("utf8");

        assert!(out.starts_with("Montreal, CA\n"));
        assert!(out.contains("  light snow   -5°C / 23°F\n"));
        assert!(out.contains("  Visibility   N/A\n"));
        assert!(out.contains("  Sunrise      7:30 AM\n"));
        assert!(out.contains("Freezing! -5°C / 23°F"));
        assert!(out.contains("  [ ]  7. Winter boots\n  [ ]  8. Winter boots\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn errors_and_progress_go_to_err() {
        let mut sink = TerminalSink::new(Vec::new(), Vec::new());
        sink.show_loading("Oslo");
        sink.show_error(&ErrorNotice::new("Please enter a city name"));

        let (out, err) = sink.into_parts();
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).expect("utf8"),
            "Loading weather data for Oslo...\nPlease enter a city name\n"
        );
    }

    #[test]
    fn checked_entries_are_marked() {
        let mut report = snowy_report();
        report.checklist.toggle(0);

        let mut sink = TerminalSink::new(Vec::new(), Vec::new());
        sink.print_checklist(&report.checklist);

        let out = String::from_utf8(sink.into_parts().0).expect("utf8");
        assert!(out.contains("  [x]  1. Phone\n  [ ]  2. Keys\n"));
    }

    #[test]
    fn write_failures_are_kept_until_taken() {
        let mut sink = TerminalSink::new(ClosedPipe, Vec::new());
        sink.render(&snowy_report());
        sink.print_checklist(&snowy_report().checklist);

        let err = sink.take_io_error().expect("write error recorded");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(sink.take_io_error().is_none());

        let mut json = JsonSink { out: ClosedPipe, err: Vec::new(), io_error: None };
        json.render(&snowy_report());
        assert!(json.take_io_error().is_some());
    }

    #[test]
    fn interactive_errors_reach_the_banner_only() {
        let mut terminal = TerminalSink::new(Vec::new(), Vec::new());
        let mut banner = ErrorBanner::default();

        let mut sink = InteractiveSink::new(&mut terminal, &mut banner);
        sink.show_loading("Oslo");
        sink.show_error(&ErrorNotice::new("City not found. Please try again."));

        assert_eq!(
            banner.visible(Instant::now()).map(|n| n.message.as_str()),
            Some("City not found. Please try again.")
        );
        let (_, err) = terminal.into_parts();
        assert_eq!(String::from_utf8(err).expect("utf8"), "Loading weather data for Oslo...\n");
    }

    #[test]
    fn interactive_render_clears_the_banner() {
        let mut terminal = TerminalSink::new(Vec::new(), Vec::new());
        let mut banner = ErrorBanner::default();
        banner.post(ErrorNotice::new("stale"), Instant::now());

        InteractiveSink::new(&mut terminal, &mut banner).render(&snowy_report());

        assert!(banner.visible(Instant::now()).is_none());
        let (out, _) = terminal.into_parts();
        assert!(String::from_utf8(out).expect("utf8").starts_with("Montreal, CA\n"));
    }
}
