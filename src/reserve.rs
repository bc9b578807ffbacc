// src/reserve.rs
//
// Reservation delivery. Two interchangeable sinks:
//
// - IssueLink: a prefilled "new issue" URL in the shop repo; the visitor
//              finishes and submits it on GitHub.
// - FormPost:  a multipart POST to a form-handling service that answers
//              with a JSON `{ success, message }` envelope.
//
// Which one is used is a configuration choice (`form_endpoint`), callers
// only ever see `ReservationSink::submit`.

use reqwest::blocking::{multipart::Form, Client};
use reqwest::Url;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::consts::{RESERVE_TAG, WEB_BASE};
use crate::config::ShopOptions;
use crate::error::ReserveError;
use crate::present::money;
use crate::product::Product;

/// What the visitor tells the seller. Blank fields stay blank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub contact: String,
    pub payment: String,
    pub delivery: String,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reservation {
    /// Open this URL to finish the reservation.
    Link(String),
    /// The form service accepted it.
    Submitted { message: String },
}

pub enum ReservationSink {
    IssueLink {
        owner: String,
        repo: String,
        label: String,
        instructions: String,
    },
    FormPost {
        client: Client,
        endpoint: Url,
        subject_prefix: String,
    },
}

impl ReservationSink {
    pub fn from_options(opts: &ShopOptions) -> Result<Self, ReserveError> {
        match opts.form_endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(endpoint) => {
                let endpoint = Url::parse(endpoint)
                    .map_err(|e| ReserveError::Endpoint(format!("{endpoint}: {e}")))?;
                let client = Client::builder().timeout(opts.request_timeout()).build()?;
                Ok(ReservationSink::FormPost {
                    client,
                    endpoint,
                    subject_prefix: opts.form_subject_prefix.clone(),
                })
            }
            None => Ok(ReservationSink::IssueLink {
                owner: opts.shop_owner.clone(),
                repo: opts.shop_repo.clone(),
                label: opts.reservation_label.clone(),
                instructions: opts.reservation_instructions.clone(),
            }),
        }
    }

    pub fn submit(&self, item: &Product, contact: &Contact) -> Result<Reservation, ReserveError> {
        match self {
            ReservationSink::IssueLink { owner, repo, label, instructions } => {
                let title = reserve_title(item);
                let body = reserve_body(item, contact, instructions);
                let url = new_issue_url(owner, repo, label, &title, &body)?;
                info!(number = item.number(), "built reservation link");
                Ok(Reservation::Link(url))
            }
            ReservationSink::FormPost { client, endpoint, subject_prefix } => {
                let form = reservation_form(item, contact, subject_prefix);
                let res = client
                    .post(endpoint.clone())
                    .header(reqwest::header::ACCEPT, "application/json")
                    .multipart(form)
                    .send()?;
                let status = res.status().as_u16();
                let text = res.text()?;
                let outcome = parse_envelope(status, &text);
                match &outcome {
                    Ok(_) => info!(number = item.number(), "reservation submitted"),
                    Err(e) => warn!(number = item.number(), error = %e, "reservation rejected"),
                }
                outcome
            }
        }
    }
}

/// `[RESERVE] House - Name (50mL)`; the size suffix only when known.
pub fn reserve_title(item: &Product) -> String {
    let mut title = join!(RESERVE_TAG, " ", &item.display_title());
    if let Some(ml) = item.volume_ml() {
        title.push_str(&format!(" ({ml}mL)"));
    }
    title
}

/// Markdown body for the prefilled issue.
pub fn reserve_body(item: &Product, contact: &Contact, instructions: &str) -> String {
    let instructions = if instructions.trim().is_empty() {
        "Fill in your contact info below."
    } else {
        instructions
    };

    let mut lines: Vec<String> = vec![s!(instructions), s!(), s!("## Item")];
    lines.push(format!("- **House:** {}", item.house()));
    lines.push(format!("- **Name:** {}", item.name()));
    if !item.kind().is_empty() {
        lines.push(format!("- **Type:** {}", item.kind()));
    }
    if let Some(ml) = item.volume_ml() {
        lines.push(format!("- **Size:** {ml} mL"));
    }
    if item.asking_price().is_some() {
        lines.push(format!("- **Price:** {}", money(item.asking_price())));
    }
    lines.push(format!("- **Inventory link:** {}", item.url()));
    lines.push(s!());
    lines.push(s!("## Your info"));
    lines.push(format!("- **Name:** {}", contact.name.trim()));
    lines.push(format!("- **Contact (IG/Email/Whatnot):** {}", contact.contact.trim()));
    lines.push(format!("- **Payment method:** {}", contact.payment.trim()));
    lines.push(format!("- **Shipping or pickup:** {}", contact.delivery.trim()));
    lines.push(s!());
    lines.push(s!("## Notes (optional)"));
    lines.push(s!(contact.notes.trim()));

    lines.join("\n")
}

/// `https://github.com/{owner}/{repo}/issues/new?labels=…&title=…&body=…`
pub fn new_issue_url(
    owner: &str,
    repo: &str,
    label: &str,
    title: &str,
    body: &str,
) -> Result<String, ReserveError> {
    let base = format!("{WEB_BASE}/{owner}/{repo}/issues/new");
    let mut url = Url::parse(&base).map_err(|e| ReserveError::Endpoint(format!("{base}: {e}")))?;
    let label = if label.trim().is_empty() { "reservation" } else { label };
    let title = if title.trim().is_empty() { "[RESERVE] Item" } else { title };
    url.query_pairs_mut()
        .append_pair("labels", label)
        .append_pair("title", title)
        .append_pair("body", body);
    Ok(url.into())
}

fn reservation_form(item: &Product, contact: &Contact, subject_prefix: &str) -> Form {
    let title = reserve_title(item);
    let subject = if subject_prefix.trim().is_empty() {
        title.clone()
    } else {
        format!("{} {title}", subject_prefix.trim())
    };
    Form::new()
        .text("subject", subject)
        .text("item", title)
        .text("house", s!(item.house()))
        .text("fragrance", s!(item.name()))
        .text("type", s!(item.kind()))
        .text("size_ml", item.volume_ml().map(|v| v.to_string()).unwrap_or_default())
        .text("price", money(item.asking_price()))
        .text("listing", s!(item.url()))
        .text("name", s!(contact.name.trim()))
        .text("contact", s!(contact.contact.trim()))
        .text("payment", s!(contact.payment.trim()))
        .text("delivery", s!(contact.delivery.trim()))
        .text("notes", s!(contact.notes.trim()))
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    success: Option<bool>,
    ok: Option<bool>,
    message: Option<String>,
    error: Option<String>,
}

/// Decide success from the form service's reply. A JSON `success`/`ok`
/// flag wins over the HTTP status; the service's own words are kept.
pub fn parse_envelope(status: u16, body: &str) -> Result<Reservation, ReserveError> {
    let Ok(env) = serde_json::from_str::<Envelope>(body) else {
        return Err(ReserveError::Malformed { status, body: s!(body.trim()) });
    };
    let ok = env.success.or(env.ok).unwrap_or((200..300).contains(&status));
    if ok {
        let message = env.message.unwrap_or_else(|| s!("Reservation sent."));
        Ok(Reservation::Submitted { message })
    } else {
        let reason = env.error
            .or(env.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(ReserveError::Rejected(reason))
    }
}
