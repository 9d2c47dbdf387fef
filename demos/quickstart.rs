//! Quickstart for the SES Query API client.
//!
//! This example demonstrates:
//! - Creating a client from environment variables
//! - Sending plain text, HTML and multi-recipient emails
//! - Verifying an address and listing verified addresses
//! - Reading the send quota
//!
//! # Usage
//!
//! ```bash
//! export AWS_ACCESS_KEY_ID="..."
//! export AWS_SECRET_ACCESS_KEY="..."
//! export AWS_REGION="us-east-1"   # optional, or SES_HOST=email.eu-west-1.amazonaws.com
//! export SES_SENDER="sender@example.com"
//! export SES_RECIPIENT="recipient@example.com"
//!
//! RUST_LOG=integrations_aws_ses_simple=debug cargo run --example quickstart
//! ```

use integrations_aws_ses_simple::{
    EmailBuilder, ParsedResponse, SendEmailResponse, SendQuota, SesClient, SesResult,
};
use tracing_subscriber::EnvFilter;

fn report(label: &str, result: SesResult<ParsedResponse>) {
    match result {
        Ok(response) => match SendEmailResponse::from_response(&response) {
            Ok(sent) => println!("   ✓ {} (message id {})\n", label, sent.message_id),
            Err(_) => println!("   ✓ {}\n", label),
        },
        Err(e) => println!("   ✗ {} failed: {}\n", label, e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    println!("=== SES Quickstart ===\n");

    let client = SesClient::from_env()?;
    println!("Using {} (region {})\n", client.host(), client.region());

    let sender = std::env::var("SES_SENDER").unwrap_or_else(|_| "sender@example.com".to_string());
    let recipient =
        std::env::var("SES_RECIPIENT").unwrap_or_else(|_| "recipient@example.com".to_string());

    println!("1. Sending a plain text email...");
    let text = EmailBuilder::new()
        .from(&sender)
        .to(&recipient)
        .subject("Test Email from SES")
        .text("This is a plain text message sent via Amazon SES.")
        .build()?;
    report("text email sent", client.send_email(&text).await);

    println!("2. Sending an HTML email...");
    let html = EmailBuilder::new()
        .from(&sender)
        .to(&recipient)
        .subject("HTML Email Test")
        .text("This is the plain text version.")
        .html(
            "<html><body><h1>Hello from Amazon SES!</h1>\
             <p>This is an <strong>HTML</strong> email.</p></body></html>",
        )
        .build()?;
    report("HTML email sent", client.send_email(&html).await);

    println!("3. Sending to multiple recipients...");
    let bulk = EmailBuilder::new()
        .from(&sender)
        .to_all(["user1@example.com", "user2@example.com", "user3@example.com"])
        .subject("Bulk Email Test")
        .text("This message is sent to multiple recipients.")
        .build()?;
    report("multi-recipient email sent", client.send_email(&bulk).await);

    println!("4. Requesting verification of {}...", recipient);
    report(
        "verification email requested",
        client.verify_email_address(&recipient).await,
    );

    println!("5. Listing verified addresses...");
    match client.list_verified_email_addresses().await {
        Ok(response) => println!(
            "   ✓ last verified address: {}\n",
            response
                .lookup_text("ListVerifiedEmailAddressesResult.VerifiedEmailAddresses.member")
                .unwrap_or("(none)")
        ),
        Err(e) => println!("   ✗ listing failed: {}\n", e),
    }

    println!("6. Reading the send quota...");
    match client.get_send_quota().await {
        Ok(response) => {
            let quota = SendQuota::from_response(&response)?;
            println!("   Max 24 hour send: {}", quota.max_24_hour_send);
            println!("   Max send rate:    {}/s", quota.max_send_rate);
            println!("   Sent last 24 h:   {}", quota.sent_last_24_hours);
            println!("   Remaining:        {}", quota.remaining());
        }
        Err(e) => println!("   ✗ quota lookup failed: {}", e),
    }

    Ok(())
}
