//! Outbound email: business notification and submitter confirmation.
//!
//! Both messages are rendered as multipart alternative (plain text + HTML)
//! and handed to a pooled SMTP transport. Each send is attempted exactly
//! once; there is no retry or queue.

use crate::config::Config;
use crate::util::html_escape;
use chrono::{DateTime, Utc};
use lettre::{
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::{Mailbox, MultiPart},
  transport::smtp::authentication::Credentials,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
  #[error("invalid mailbox address: {0}")]
  Address(#[from] lettre::address::AddressError),
  #[error("failed to build message: {0}")]
  Build(#[from] lettre::error::Error),
  #[error("smtp transport error: {0}")]
  Transport(#[from] lettre::transport::smtp::Error),
}

/// Public fields of a submission handed to the renderers.
#[derive(Debug, Clone)]
pub struct ContactData {
  pub name: String,
  pub email: String,
  pub company: Option<String>,
  pub message: String,
  pub ip_address: Option<String>,
  pub submitted_at: DateTime<Utc>,
}

/// Holds the SMTP transport plus the fixed sender and recipient mailboxes.
///
/// Constructed once at startup and cloned into handlers; the underlying
/// transport pools its connections.
#[derive(Clone)]
pub struct Mailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from: Mailbox,
  recipient: Mailbox,
  site_name: String,
}

impl Mailer {
  pub fn from_config(cfg: &Config) -> Result<Self, MailError> {
    let mut builder = if cfg.smtp.secure {
      AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp.host)?.port(cfg.smtp.port)
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.smtp.host).port(cfg.smtp.port)
    };
    if let (Some(user), Some(pass)) = (&cfg.smtp.user, &cfg.smtp.pass) {
      builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }
    Ok(Mailer {
      transport: builder.build(),
      from: cfg.smtp.from.parse()?,
      recipient: cfg.recipient.parse()?,
      site_name: cfg.site_name.clone(),
    })
  }

  /// Notify the configured business recipient about a new submission.
  pub async fn send_business_notification(&self, c: &ContactData) -> Result<(), MailError> {
    let email = Message::builder()
      .from(self.from.clone())
      .to(self.recipient.clone())
      .subject(format!("New contact form submission from {}", c.name))
      .multipart(MultiPart::alternative_plain_html(
        business_text(c),
        business_html(c),
      ))?;
    self.transport.send(email).await?;
    Ok(())
  }

  /// Best-effort acknowledgement to the submitter.
  pub async fn send_confirmation(&self, c: &ContactData) -> Result<(), MailError> {
    let to: Mailbox = c.email.parse()?;
    let email = Message::builder()
      .from(self.from.clone())
      .to(to)
      .subject(format!("Thank you for contacting {}", self.site_name))
      .multipart(MultiPart::alternative_plain_html(
        confirmation_text(c, &self.site_name),
        confirmation_html(c, &self.site_name),
      ))?;
    self.transport.send(email).await?;
    Ok(())
  }
}

/// Fixed cosmetic presentation for email footers.
fn format_timestamp(ts: DateTime<Utc>) -> String {
  ts.format("%d %b %Y %H:%M UTC").to_string()
}

fn business_text(c: &ContactData) -> String {
  let mut out = String::from("New contact form submission\n\n");
  out.push_str(&format!("Name: {}\n", c.name));
  out.push_str(&format!("Email: {}\n", c.email));
  if let Some(company) = &c.company {
    out.push_str(&format!("Company: {}\n", company));
  }
  out.push_str(&format!("\nMessage:\n{}\n", c.message));
  out.push_str(&format!(
    "\nSubmitted on {}\n",
    format_timestamp(c.submitted_at)
  ));
  if let Some(ip) = &c.ip_address {
    out.push_str(&format!("IP address: {}\n", ip));
  }
  out
}

fn field_html(label: &str, value_html: &str) -> String {
  format!(r#"<div><div class="label">{label}</div><div class="value">{value_html}</div></div>"#)
}

fn business_html(c: &ContactData) -> String {
  let mut fields = String::new();
  fields.push_str(&field_html("Name", &html_escape(&c.name)));
  fields.push_str(&field_html(
    "Email",
    &format!(
      r#"<a href="mailto:{0}">{0}</a>"#,
      html_escape(&c.email)
    ),
  ));
  if let Some(company) = &c.company {
    fields.push_str(&field_html("Company", &html_escape(company)));
  }
  fields.push_str(&field_html(
    "Message",
    &html_escape(&c.message).replace('\n', "<br>"),
  ));

  let mut footer = format!("<p>Submitted on {}</p>", format_timestamp(c.submitted_at));
  if let Some(ip) = &c.ip_address {
    footer.push_str(&format!("<p>IP address: {}</p>", html_escape(ip)));
  }

  format!(
    r#"<!doctype html>
<html><head><meta charset="utf-8" />
<style>
  body {{ font-family: system-ui, sans-serif; color: #222; line-height: 1.5; }}
  .wrap {{ max-width: 600px; margin: 0 auto; padding: 16px; }}
  .label {{ font-weight: 600; color: #446; }}
  .value {{ margin: 4px 0 12px; padding: 8px; background: #f6f6f8; }}
  .footer {{ margin-top: 16px; color: #666; font-size: 12px; }}
</style></head>
<body><div class="wrap">
  <h2>New contact form submission</h2>
  {fields}
  <div class="footer">{footer}</div>
</div></body></html>"#
  )
}

fn confirmation_text(c: &ContactData, site: &str) -> String {
  format!(
    "Thank you for contacting {site}!\n\n\
     Hi {name},\n\n\
     We've received your message and will get back to you within 24 hours.\n\
     Our team is reviewing your inquiry and will follow up with a detailed response soon.\n\n\
     Submitted on {ts}\n\n\
     Best regards,\n\
     The {site} team\n",
    site = site,
    name = c.name,
    ts = format_timestamp(c.submitted_at)
  )
}

fn confirmation_html(c: &ContactData, site: &str) -> String {
  format!(
    r#"<!doctype html>
<html><head><meta charset="utf-8" />
<style>
  body {{ font-family: system-ui, sans-serif; color: #222; line-height: 1.5; }}
  .wrap {{ max-width: 600px; margin: 0 auto; padding: 16px; }}
  .footer {{ margin-top: 16px; color: #666; font-size: 12px; }}
</style></head>
<body><div class="wrap">
  <h2>Thank you for reaching out!</h2>
  <p>Hi {name},</p>
  <p>We've received your message and will get back to you within 24 hours.</p>
  <p>Our team is reviewing your inquiry and will follow up with a detailed response soon.</p>
  <div class="footer">
    <p>Submitted on {ts}</p>
    <p>The {site} team</p>
  </div>
</div></body></html>"#,
    name = html_escape(&c.name),
    ts = format_timestamp(c.submitted_at),
    site = html_escape(site)
  )
}
