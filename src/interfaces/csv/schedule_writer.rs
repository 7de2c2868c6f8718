use crate::domain::penalty::PenaltyCalculator;
use crate::domain::penalty::PenaltyPolicy;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ScheduleRow<'a> {
    id: &'a str,
    label: &'a str,
    face_value: String,
    due_date: String,
    penalty: String,
}

fn describe(policy: PenaltyPolicy) -> String {
    match policy {
        PenaltyPolicy::Flat { amount } => format!("flat {}", amount),
        PenaltyPolicy::RateOnce { rate } => format!("{} of face value", rate),
        PenaltyPolicy::RatePerDay { rate } => format!("{} of face value per day", rate),
    }
}

/// Writes the configured installment table, with the penalty in force for each row.
pub struct ScheduleWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ScheduleWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_schedule(&mut self, calculator: &PenaltyCalculator) -> Result<()> {
        for installment in calculator.schedule().definitions() {
            self.writer.serialize(ScheduleRow {
                id: installment.id.as_str(),
                label: &installment.label,
                face_value: installment.face_value.to_string(),
                due_date: installment.due_date.to_string(),
                penalty: describe(calculator.policy_for(installment)),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
