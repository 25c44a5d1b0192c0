use anyhow::Result;
use warmer_core::DisplayPayload;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn render(payload: &DisplayPayload, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(payload)?),
        OutputFormat::Text => Ok(render_text(payload)),
    }
}

fn render_text(payload: &DisplayPayload) -> String {
    let status: &'static str = payload.status.into();
    let mut line = format!(
        "[{:>2}] {:<11} {}",
        payload.countdown, status, payload.distance_text
    );

    if payload.show_waiting_indicator {
        line.push_str("  (waiting for position)");
    }
    if let Some(fault) = payload.fault {
        line.push_str(&format!("  ({fault})"));
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use warmer_core::StatusText;
    use warmer_core::location::LocationError;

    fn payload() -> DisplayPayload {
        DisplayPayload {
            distance_text: "842 m".into(),
            status: StatusText::Warmer,
            countdown: 9,
            show_waiting_indicator: false,
            fault: None,
        }
    }

    #[test]
    fn test_text() {
        assert_eq!(render(&payload(), OutputFormat::Text).unwrap(), "[ 9] warmer      842 m");
    }

    #[test]
    fn test_text_with_fault() {
        let faulted = DisplayPayload {
            status: StatusText::NoSignal,
            distance_text: "unknown".into(),
            fault: Some(LocationError::Timeout),
            ..payload()
        };
        assert_eq!(
            render(&faulted, OutputFormat::Text).unwrap(),
            "[ 9] no signal   unknown  (Location request timed out)"
        );
    }

    #[test]
    fn test_json() {
        let json = render(&payload(), OutputFormat::Json).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains(r#""status":"warmer""#));
    }
}
