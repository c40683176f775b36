//! Send a test email to a locally running MailStub server.
//!
//! Usage:
//!   cargo run --example send -- <project_id> [port]

use mailstub_client::{Client, SendEmailOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let project_id = args.next().unwrap_or_else(|| "p_demo".to_string());
    let port: u16 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 8000,
    };

    println!("📧 MailStub Rust Client - Send Demo");
    println!("{}", "=".repeat(50));

    let client = Client::builder().port(port).build();
    println!("\n🔌 Sending via http://localhost:{port} ...");

    let options = SendEmailOptions {
        sender: "noreply@myapp.local".to_string(),
        receiver: "user@example.com".to_string(),
        subject: "Welcome!".to_string(),
        body: "<h1>Hello from mailstub-client</h1>".to_string(),
    };

    match client.send(&project_id, &options).await {
        Ok(response) => {
            let message = response.message;
            println!("\n✅ Message created");
            println!("   ID:        {}", message.id);
            println!("   Project:   {}", message.project_id);
            println!("   From:      {}", message.sender);
            println!("   To:        {}", message.receiver);
            println!("   Subject:   {}", message.subject);
            println!("   Created:   {}", message.created_at);
        }
        Err(e) => {
            eprintln!("\n❌ {e}");
            std::process::exit(1);
        }
    }

    println!("\n{}", "=".repeat(50));
    println!("✨ Done!");
    Ok(())
}
