//! Validation happens before any network activity: these tests pair invalid
//! inputs with a mock server that must see zero requests.

use ollama_stream::{
    ChatRequest, ChunkAction, Endpoint, Error, GenerateOptions, JsonSchema, Message, OllamaClient,
    SchemaBuilder,
};
use serde_json::json;

#[tokio::test]
async fn unknown_role_fails_before_any_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .expect(0)
        .create_async()
        .await;

    // Role strings are validated at message construction.
    let err = Message::from_parts("robot", "beep").unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert!(err.is_caller_fault());

    mock.assert_async().await;
}

#[tokio::test]
async fn empty_chat_fails_before_any_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .expect(0)
        .create_async()
        .await;

    let client = OllamaClient::builder().host(server.url()).build().unwrap();
    let err = ChatRequest::builder("test-model").build().unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    // A request that never built can never be dispatched.
    drop(client);
    mock.assert_async().await;
}

#[test]
fn schema_required_must_reference_declared_properties() {
    let err = JsonSchema::from_value(json!({
        "type": "object",
        "properties": {
            "scientific_name": {"type": "string"},
        },
        "required": ["scientific_name", "average_weight"],
    }))
    .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert!(err.to_string().contains("average_weight"));
}

#[test]
fn schema_builder_covers_the_structured_output_shape() {
    let schema = SchemaBuilder::new()
        .field("scientific_name", "string")
        .field("main_species", "string")
        .field("average_length", "number")
        .field("average_lifespan", "number")
        .field("average_weight", "number")
        .array_field("countries", "string")
        .required("scientific_name")
        .required("main_species")
        .required("average_length")
        .required("average_lifespan")
        .required("average_weight")
        .required("countries")
        .build()
        .unwrap();

    let v = schema.as_value();
    assert_eq!(v["type"], "object");
    assert_eq!(v["required"].as_array().unwrap().len(), 6);
}

#[test]
fn reserved_option_key_is_rejected() {
    let err = GenerateOptions::new().extra("repeat_last_n", 2).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn invalid_endpoint_override_is_a_configuration_error() {
    let err = Endpoint::resolve(Some("::not-a-url::")).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.is_caller_fault());
}

#[tokio::test]
async fn valid_request_reaches_the_wire_exactly_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(mockito::Matcher::PartialJson(json!({
            "model": "test-model",
            "stream": false,
            "format": "json",
            "options": {"temperature": 0.0, "repeat_last_n": 2},
        })))
        .with_status(200)
        .with_body("{\"message\":{\"role\":\"assistant\",\"content\":\"{}\"},\"done\":true}")
        .expect(1)
        .create_async()
        .await;

    let client = OllamaClient::builder().host(server.url()).build().unwrap();
    let request = ChatRequest::builder("test-model")
        .message(Message::user("chicken"))
        .options(GenerateOptions::new().temperature(0.0).repeat_last_n(2))
        .format(ollama_stream::OutputFormat::Json)
        .stream(false)
        .build()
        .unwrap();

    client
        .dispatch(&request, |_| ChunkAction::Continue)
        .await
        .unwrap();

    mock.assert_async().await;
}
