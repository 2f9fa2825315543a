use crate::outputs::escape_data;
use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Plain log lines for INFO and below; warnings and errors become workflow
/// annotations so they show up on the run summary.
pub fn init(debug: bool) {
    let default = if debug { "setup_bdy=debug" } else { "setup_bdy=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let plain = tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_filter(filter_fn(|meta| *meta.level() > Level::WARN));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(AnnotationLayer)
        .try_init();
}

struct AnnotationLayer;

impl<S: Subscriber> Layer<S> for AnnotationLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if let Some(line) = annotation(event) {
            println!("{line}");
        }
    }
}

fn annotation(event: &Event<'_>) -> Option<String> {
    let command = match *event.metadata().level() {
        Level::ERROR => "error",
        Level::WARN => "warning",
        _ => return None,
    };
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);
    Some(format!("::{command}::{}", escape_data(&visitor.text())))
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn text(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}
