use crate::config::Institution;
use crate::domain::ports::Confirmation;

pub const SUBJECT: &str = "Payment Confirmation";

/// A rendered confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Renders confirmations in the institution's letter format.
#[derive(Debug, Clone)]
pub struct ConfirmationTemplate {
    institution: Institution,
}

impl ConfirmationTemplate {
    pub fn new(institution: Institution) -> Self {
        Self { institution }
    }

    pub fn render(&self, confirmation: &Confirmation) -> Message {
        let currency = &self.institution.currency;
        let summary = &confirmation.summary;
        let installments = confirmation
            .installments
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let reference = confirmation
            .reference_number
            .as_ref()
            .map(|reference| format!("Reference Number: {}\n", reference))
            .unwrap_or_default();
        let body = format!(
            "Dear {name},\n\n\
             Thank you for your payment. Below are your payment details:\n\n\
             Student Number: {student_number}\n\
             {reference}\
             Selected Installments: {installments}\n\n\
             Total Amount Due: {total_due} {currency}\n\
             Penalties Applied: {penalties} {currency}\n\
             Total Paid: {total_paid} {currency}\n\
             Balance: {balance} {currency}\n\n\
             If you have any questions, please contact {institution} at {contact}.\n\n\
             Regards,\n\
             {institution}\n",
            name = confirmation.payer.name,
            student_number = confirmation.payer.student_number,
            total_due = summary.total_due,
            penalties = summary.penalties,
            total_paid = summary.total_paid,
            balance = summary.balance,
            institution = self.institution.name,
            contact = self.institution.contact,
        );

        Message {
            to: confirmation.payer.email.clone(),
            subject: SUBJECT.to_string(),
            body,
        }
    }
}
