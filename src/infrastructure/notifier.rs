use crate::domain::ports::{Confirmation, Notifier};
use crate::error::{PaymentError, Result};
use crate::interfaces::email::confirmation::{ConfirmationTemplate, Message};
use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Emits rendered confirmations through `tracing` instead of delivering them.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    template: ConfirmationTemplate,
}

impl LogNotifier {
    pub fn new(template: ConfirmationTemplate) -> Self {
        Self { template }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, confirmation: &Confirmation) -> Result<()> {
        let message = self.template.render(confirmation);
        info!(to = %message.to, subject = %message.subject, body = %message.body, "confirmation issued");
        Ok(())
    }
}

/// Writes rendered confirmations to any `Write` sink, e.g. stdout or a file.
///
/// The sink sits behind a mutex so the notifier stays `Send + Sync`.
pub struct WriterNotifier<W: Write + Send> {
    template: ConfirmationTemplate,
    sink: Arc<Mutex<W>>,
}

impl<W: Write + Send> WriterNotifier<W> {
    pub fn new(template: ConfirmationTemplate, sink: W) -> Self {
        Self {
            template,
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// Shared handle to the sink, for inspecting what was written.
    pub fn sink(&self) -> Arc<Mutex<W>> {
        self.sink.clone()
    }

    fn write_message(&self, message: &Message) -> Result<()> {
        let mut sink = self.sink.lock().map_err(|_| {
            PaymentError::NotificationError("Confirmation sink lock poisoned".to_string())
        })?;
        write_to(&mut *sink, message).map_err(|e| {
            PaymentError::NotificationError(format!("Cannot write confirmation: {}", e))
        })
    }
}

fn write_to<W: Write>(sink: &mut W, message: &Message) -> io::Result<()> {
    writeln!(sink, "To: {}", message.to)?;
    writeln!(sink, "Subject: {}", message.subject)?;
    writeln!(sink)?;
    sink.write_all(message.body.as_bytes())?;
    writeln!(sink)?;
    sink.flush()
}

#[async_trait]
impl<W: Write + Send + 'static> Notifier for WriterNotifier<W> {
    async fn notify(&self, confirmation: &Confirmation) -> Result<()> {
        let message = self.template.render(confirmation);
        self.write_message(&message)
    }
}
