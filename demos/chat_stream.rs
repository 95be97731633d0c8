//! Stream a chat completion and print the text deltas as they arrive.
//!
//! Run with:
//! ```bash
//! export OPENAI_API_KEY="your-api-key"
//! cargo run --example chat_stream
//! ```

use std::io::Write;

use futures::StreamExt;
use oai_client::{RequestClient, StreamingClient, TransportOptions};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = TransportOptions::from_env()?;

    let models = RequestClient::new(options.clone())?
        .request("GET models", None)
        .await?;
    let count = models["data"].as_array().map_or(0, Vec::len);
    println!("{count} models available");

    let client = StreamingClient::new(options)?;
    let mut chunks = client.stream(
        "chat/completions",
        json!({
            "model": "gpt-4o-mini",
            "stream": true,
            "messages": [
                {"role": "user", "content": "What is the capital of France? Answer in one word."}
            ],
        }),
    );

    println!("\n=== Response ===");
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        if let Some(delta) = chunk["data"]["choices"][0]["delta"]["content"].as_str() {
            print!("{delta}");
            std::io::stdout().flush()?;
        }
    }
    println!();

    Ok(())
}
