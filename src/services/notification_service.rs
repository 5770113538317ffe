use crate::{
    dto::notifications::{ContactRequest, FeedbackRequest, NotificationReceipt},
    error::{AppError, AppResult},
    mailer::OutgoingEmail,
    response::{ApiResponse, Meta},
    state::AppState,
};

const MAIL_FROM: &str = "KIKO Robot <onboarding@resend.dev>";
const MAIL_TO: &str = "kikorobotai@gmail.com";

/// Contact-form funnel: validate, send, archive. The archive write happens
/// on both outcomes; a provider failure still fails the request so the
/// submitter knows to follow up.
pub async fn send_contact(
    state: &AppState,
    payload: ContactRequest,
) -> AppResult<ApiResponse<NotificationReceipt>> {
    let (name, email, message) = match (
        non_empty(payload.name.as_deref()),
        non_empty(payload.email.as_deref()),
        non_empty(payload.message.as_deref()),
    ) {
        (Some(name), Some(email), Some(message)) => (name, email, message),
        _ => {
            return Err(AppError::BadRequest(
                "Name, email, and message are required".into(),
            ));
        }
    };

    let subject = format!(
        "Contact: {}",
        non_empty(payload.subject.as_deref()).unwrap_or("No Subject")
    );
    let outgoing = OutgoingEmail {
        from: MAIL_FROM.to_string(),
        to: vec![MAIL_TO.to_string()],
        reply_to: Some(email.to_string()),
        subject,
        text: format!("Name: {name}\nEmail: {email}\n\nMessage:\n{message}"),
        html: None,
    };

    let result = state.mailer.send(&outgoing).await;
    archive(state, "contacts", "contact", &payload).await;

    let email_id = result?;
    Ok(ApiResponse::success(
        "Email sent successfully!",
        NotificationReceipt {
            email_id: Some(email_id),
        },
        Some(Meta::empty()),
    ))
}

/// Feature-feedback funnel; same dual-path rule as the contact form, with an
/// HTML rendering alongside the plain text.
pub async fn send_feedback(
    state: &AppState,
    payload: FeedbackRequest,
) -> AppResult<ApiResponse<NotificationReceipt>> {
    let (feature, description) = match (
        non_empty(payload.feature.as_deref()),
        non_empty(payload.description.as_deref()),
    ) {
        (Some(feature), Some(description)) => (feature, description),
        _ => {
            return Err(AppError::BadRequest(
                "Feature and description are required".into(),
            ));
        }
    };

    let urgency = urgency_label(payload.urgency.as_deref());
    let contact_email = non_empty(payload.contact_email.as_deref());

    let outgoing = OutgoingEmail {
        from: MAIL_FROM.to_string(),
        to: vec![MAIL_TO.to_string()],
        reply_to: contact_email.map(str::to_string),
        subject: format!("New KIKO Feature Request: {feature}"),
        text: render_feedback_text(feature, description, urgency, contact_email),
        html: Some(render_feedback_html(
            feature,
            description,
            urgency,
            contact_email,
        )),
    };

    let result = state.mailer.send(&outgoing).await;
    archive(state, "feedback", "feedback", &payload).await;

    let email_id = result?;
    Ok(ApiResponse::success(
        "Feedback submitted successfully!",
        NotificationReceipt {
            email_id: Some(email_id),
        },
        Some(Meta::empty()),
    ))
}

async fn archive<T: serde::Serialize>(state: &AppState, dir: &str, prefix: &str, payload: &T) {
    let value = match serde_json::to_value(payload) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize submission for archive");
            return;
        }
    };
    if let Err(err) = state
        .archive
        .save(dir, prefix, state.clock.now(), &value)
        .await
    {
        tracing::warn!(error = %err, dir, "failed to archive submission");
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn urgency_label(urgency: Option<&str>) -> &'static str {
    match urgency {
        Some("low") => "Nice to have",
        Some("medium") => "Important",
        Some("high") => "Critical",
        Some("critical") => "Must have",
        _ => "Not specified",
    }
}

fn render_feedback_text(
    feature: &str,
    description: &str,
    urgency: &str,
    contact_email: Option<&str>,
) -> String {
    let contact_line = match contact_email {
        Some(email) => format!("Contact Email: {email}"),
        None => "No contact email provided".to_string(),
    };
    format!(
        "NEW FEEDBACK SUBMISSION\n\n\
         Feature Category: {feature}\n\
         Importance: {urgency}\n\n\
         Description:\n{description}\n\n\
         {contact_line}\n"
    )
}

fn render_feedback_html(
    feature: &str,
    description: &str,
    urgency: &str,
    contact_email: Option<&str>,
) -> String {
    let contact_section = match contact_email {
        Some(email) => format!(
            r#"<p><strong>Contact Email:</strong> <a href="mailto:{email}">{email}</a></p>"#
        ),
        None => String::new(),
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <h1>New Feature Request</h1>
  <p>KIKO Robot Feedback System</p>
  <p><strong>Feature Category:</strong> {feature}</p>
  <p><strong>Importance:</strong> {urgency}</p>
  <p><strong>Description:</strong></p>
  <p style="white-space: pre-wrap;">{description}</p>
  {contact_section}
  <hr>
  <p style="font-size: 12px; color: #6b7280;">This feedback was submitted via the KIKO Robot website.</p>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_labels_map_known_levels() {
        assert_eq!(urgency_label(Some("low")), "Nice to have");
        assert_eq!(urgency_label(Some("critical")), "Must have");
        assert_eq!(urgency_label(Some("whenever")), "Not specified");
        assert_eq!(urgency_label(None), "Not specified");
    }

    #[test]
    fn feedback_text_mentions_every_field() {
        let text = render_feedback_text(
            "voice-control",
            "Let me talk to it across the room.",
            "Important",
            Some("ada@example.com"),
        );
        assert!(text.contains("Feature Category: voice-control"));
        assert!(text.contains("Importance: Important"));
        assert!(text.contains("Let me talk to it across the room."));
        assert!(text.contains("Contact Email: ada@example.com"));
    }

    #[test]
    fn blank_strings_count_as_missing() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some("x")), Some("x"));
        assert_eq!(non_empty(None), None);
    }
}
