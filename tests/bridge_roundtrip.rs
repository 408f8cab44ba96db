use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;

use unity_build_tools::bridge::path::IpcConfig;
use unity_build_tools::bridge::proto::{
    Envelope, EnvelopeKind, Event, HealthInfo, Request, Response, Welcome,
};
use unity_build_tools::bridge::{codec, framing, EditorBridge, EditorClient, IpcError};
use unity_build_tools::platform::TargetGroup;

/// Minimal editor-side bridge: handshake, a few requests, and a post-build
/// event pushed after every health check.
async fn mock_editor_server(listener: TcpListener) {
    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(async move {
            let mut framed = framing::into_framed(stream);
            let mut defines = "POST_FX".to_string();

            // Handshake: expect a hello request, answer with a welcome.
            let Some(Ok(bytes)) = framed.next().await else {
                return;
            };
            let Ok(env) = codec::decode_envelope(bytes.freeze()) else {
                return;
            };
            let EnvelopeKind::Request(Request::Hello(hello)) = env.kind else {
                return;
            };
            let welcome = if hello.token == "wrong-token" {
                Welcome {
                    ok: false,
                    error: "invalid token".to_string(),
                    editor_version: String::new(),
                }
            } else {
                Welcome {
                    ok: true,
                    error: String::new(),
                    editor_version: "6000.0.test".to_string(),
                }
            };
            let rejected = !welcome.ok;
            let reply = Envelope {
                correlation_id: env.correlation_id,
                kind: EnvelopeKind::Response(Response::Welcome(welcome)),
            };
            let _ = framed.send(codec::encode_envelope(&reply).unwrap()).await;
            if rejected {
                return;
            }

            while let Some(Ok(bytes)) = framed.next().await {
                let Ok(env) = codec::decode_envelope(bytes.freeze()) else {
                    continue;
                };
                let EnvelopeKind::Request(request) = env.kind else {
                    continue;
                };
                let response = match request {
                    Request::Health => Some(Response::Health(HealthInfo {
                        ready: true,
                        version: "6000.0.test".to_string(),
                        status: "ok".to_string(),
                    })),
                    Request::GetDefines { .. } => Some(Response::Defines {
                        defines: defines.clone(),
                    }),
                    Request::SetDefines { defines: new, .. } => {
                        defines = new;
                        Some(Response::Ack { ok: true })
                    }
                    _ => None,
                };
                if let Some(response) = response {
                    let is_health = matches!(response, Response::Health(_));
                    let reply = Envelope {
                        correlation_id: env.correlation_id,
                        kind: EnvelopeKind::Response(response),
                    };
                    let _ = framed.send(codec::encode_envelope(&reply).unwrap()).await;

                    // A health check also triggers a post-build event, which
                    // gives the tests a deterministic event to wait for.
                    if is_health {
                        let event = Envelope {
                            correlation_id: String::new(),
                            kind: EnvelopeKind::Event(Event::BuildFinished {
                                target: unity_build_tools::platform::BuildTarget::StandaloneLinux64,
                                output_path: "/builds/Rogue/Rogue".to_string(),
                            }),
                        };
                        let _ = framed.send(codec::encode_envelope(&event).unwrap()).await;
                    }
                }
            }
        });
    }
}

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_editor_server(listener));
    format!("tcp://{}", addr)
}

fn config(endpoint: String, token: &str) -> IpcConfig {
    IpcConfig {
        endpoint: Some(endpoint),
        token: Some(token.to_string()),
        connect_timeout: Duration::from_secs(2),
        handshake_timeout: Duration::from_secs(2),
        call_timeout: Duration::from_secs(2),
        build_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn handshake_and_health_round_trip() {
    let endpoint = start_server().await;
    let client = EditorClient::connect(config(endpoint, "test"), "/project".to_string())
        .await
        .expect("handshake should succeed");

    let health = client.health(Duration::from_secs(2)).await.unwrap();
    assert!(health.ready);
    assert_eq!(health.version, "6000.0.test");
}

#[tokio::test]
async fn rejected_token_fails_the_handshake() {
    let endpoint = start_server().await;
    let result = EditorClient::connect(config(endpoint, "wrong-token"), "/project".to_string()).await;
    assert!(matches!(result, Err(IpcError::Handshake(message)) if message == "invalid token"));
}

#[tokio::test]
async fn defines_round_trip_through_the_wire() {
    let endpoint = start_server().await;
    let client = EditorClient::connect(config(endpoint, "test"), "/project".to_string())
        .await
        .unwrap();

    assert_eq!(client.defines(TargetGroup::Standalone).await.unwrap(), "POST_FX");

    client
        .set_defines(TargetGroup::Standalone, "POST_FX;GOG_BUILD")
        .await
        .unwrap();
    assert_eq!(
        client.defines(TargetGroup::Standalone).await.unwrap(),
        "POST_FX;GOG_BUILD"
    );
}

#[tokio::test]
async fn editor_events_reach_subscribers() {
    let endpoint = start_server().await;
    let client = EditorClient::connect(config(endpoint, "test"), "/project".to_string())
        .await
        .unwrap();

    let mut events = client.events();
    let _ = client.health(Duration::from_secs(2)).await.unwrap();

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("event should arrive")
        .expect("event stream open");
    assert!(matches!(
        event,
        Event::BuildFinished { output_path, .. } if output_path == "/builds/Rogue/Rogue"
    ));
}

#[tokio::test]
async fn unreachable_endpoint_times_out() {
    // TEST-NET address, nothing listens there.
    let result = EditorClient::connect(
        config("tcp://192.0.2.1:7777".to_string(), "test"),
        "/project".to_string(),
    )
    .await;
    assert!(result.is_err());
}
