mod engine;

use std::sync::Arc;
use std::time::Duration;

use chorus::{
    Scheduler, SchedulerConfig, SpeechBatcher, SynthesisRequest, VoiceReference,
};
use futures::StreamExt;
use tracing::{info, warn};

use crate::engine::SineEngine;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chorus=debug".into()),
        )
        .init();

    let config = SchedulerConfig {
        max_batch_size: 4,
        max_wait: Duration::from_millis(50),
        executor_threads: 1,
    };
    let scheduler = Arc::new(Scheduler::start(SineEngine::new(), config).expect("valid config"));

    let texts = [
        "hello from the batching scheduler",
        "six concurrent callers one engine",
        "this text is unpronounceable on purpose",
        "tasks share a window not a fate",
        "streaming chunk by chunk",
        "last one through the gate",
    ];

    let handles = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let scheduler = scheduler.clone();
            tokio::spawn(async move {
                let reference = VoiceReference::new("/voices/paimon_prompt.wav");
                let request = if i % 2 == 0 {
                    SynthesisRequest::zero_shot(text, reference)
                } else {
                    SynthesisRequest::instruct(text, "speak warmly", reference)
                };

                let handle = match scheduler.submit(request).await {
                    Ok(handle) => handle,
                    Err(err) => {
                        warn!(caller = i, %err, "submission rejected");
                        return;
                    }
                };

                let mut stream = handle.stream();
                let mut chunks = 0usize;
                let mut samples = 0usize;
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(chunk) => {
                            chunks += 1;
                            samples += chunk.len();
                        }
                        Err(err) => {
                            warn!(caller = i, %err, "synthesis failed");
                            return;
                        }
                    }
                }
                info!(caller = i, chunks, samples, "caller finished");
            })
        })
        .collect::<Vec<_>>();

    for handle in futures::future::join_all(handles).await {
        if let Err(err) = handle {
            warn!(%err, "caller task panicked");
        }
    }

    scheduler.shutdown().await;
    info!(state = ?scheduler.state(), "scheduler drained");
}
