use std::process::ExitCode;

use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rekt_core::{
    ASSERT_ERROR, AssertOptions, Disposition, ErrorInstance, ErrorSpec, Rekt, RektBuilder,
    RektConfig, RektError, ensure,
};

/// What a web framework would write back to the client.
#[derive(Debug, Serialize)]
struct Reply<'a> {
    status: u16,
    body: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a ErrorInstance>,
}

/// A fake request handler: look up a user by id.
fn get_user(rekt: &Rekt, id: i64) -> Result<serde_json::Value, RektError> {
    ensure!(rekt, id >= 0, "user id must be non-negative, got", id.to_string())?;
    if id != 1 {
        return Err(rekt.error("NotFound", format!("no user with id {id}"))?.into());
    }
    Ok(serde_json::json!({ "id": id, "name": "weaver" }))
}

/// Turn a handler result into a reply; unexpected failures go to the registered handler.
fn respond(rekt: &Rekt, result: Result<serde_json::Value, RektError>) -> (String, Disposition) {
    let (reply, disposition) = match &result {
        Ok(body) => (
            Reply {
                status: 200,
                body: body.clone(),
                error: None,
            },
            Disposition::Recoverable,
        ),
        Err(RektError::Raised(err)) => {
            let disposition = match rekt.dispatch(err.name(), err) {
                Ok(disposition) => disposition,
                Err(RektError::HandlerNotFound(_)) => Disposition::of(err),
                Err(other) => {
                    error!("dispatch failed: {other}");
                    Disposition::Fatal
                }
            };
            (
                Reply {
                    status: err.status(),
                    body: serde_json::json!({ "error": err.name(), "message": err.message() }),
                    error: Some(err),
                },
                disposition,
            )
        }
        Err(other) => {
            error!("request failed outside the registry: {other}");
            (
                Reply {
                    status: 500,
                    body: serde_json::json!({ "error": "Internal" }),
                    error: None,
                },
                Disposition::Fatal,
            )
        }
    };
    let line = serde_json::to_string(&reply).unwrap_or_else(|e| format!("{{\"encode\":\"{e}\"}}"));
    (line, disposition)
}

fn load_config() -> Result<RektConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            info!("loaded config from {path}");
            Ok(RektConfig::from_json_str(&raw)?)
        }
        None => Ok(RektConfig::default()),
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // (A) 設定を読み込み、コンテキストを構築
    let rekt = RektBuilder::new()
        .config(load_config()?)
        .register_error(ErrorSpec::named("UpstreamDown").with_status(503))
        .handler("NotFound", |err: &ErrorInstance| {
            info!(status = err.status(), "not found: {}", err.message().unwrap_or_default())
        })
        .handler(ASSERT_ERROR, |err: &ErrorInstance| {
            error!("assertion failed in handler: {err}")
        })
        .expect_errors(&["NotFound", "UpstreamDown"])
        .build()?;

    // (B) リクエストを処理して応答を表示
    let mut fatal = false;
    for id in [1, 2, -5] {
        let (reply, disposition) = respond(&rekt, get_user(&rekt, id));
        println!("GET /users/{id} -> {reply} [{disposition:?}]");
        fatal |= disposition.is_fatal();
    }

    // (C) コールバック経由の失敗は throw せずに処理される
    let outcome = rekt.assert(
        false,
        AssertOptions::message("cache warm-up incomplete")
            .on_failure(|err| println!("deferred: {err}")),
    )?;
    println!("callback assertion -> {outcome:?}");

    // (D) プロセスの終了は呼び出し側が決める
    Ok(if fatal {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("rekt-cli: {e}");
            ExitCode::FAILURE
        }
    }
}
