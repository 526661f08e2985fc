//! Dataverse client against a mock Web API.

use tagkit_core::{
    Error, PolicyKey, RecordRef, RecordTagRepository, TagDefinitionRepository,
    TagPolicyRepository,
};
use tagkit_dataverse::{DataverseClient, DataverseConfig};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/api/data/v9.2";

fn client_for(server: &MockServer) -> DataverseClient {
    let mut config = DataverseConfig::new(server.uri());
    config.token = Some("test-token".to_string());
    config.timeout_seconds = 5;
    DataverseClient::new(config).expect("Failed to create client")
}

#[tokio::test]
async fn test_list_tag_definitions_sends_auth_and_select() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_tagdefinitions")))
        .and(query_param("$select", "evergrn_name"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("OData-Version", "4.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                { "evergrn_name": "Billing" },
                { "evergrn_name": " Urgent " },
                { "evergrn_name": null }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let names = client_for(&server).list_tag_definitions().await.unwrap();

    assert_eq!(names, vec!["Billing".to_string(), " Urgent ".to_string()]);
}

#[tokio::test]
async fn test_list_tag_definitions_follows_next_link() {
    let server = MockServer::start().await;
    let next = format!("{}{API}/evergrn_tagdefinitions?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_tagdefinitions")))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{ "evergrn_name": "Vip" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_tagdefinitions")))
        .and(query_param("$select", "evergrn_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{ "evergrn_name": "Billing" }],
            "@odata.nextLink": next
        })))
        .expect(1)
        .mount(&server)
        .await;

    let names = client_for(&server).list_tag_definitions().await.unwrap();

    assert_eq!(names, vec!["Billing".to_string(), "Vip".to_string()]);
}

#[tokio::test]
async fn test_find_tag_definitions_escapes_quotes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_tagdefinitions")))
        .and(query_param(
            "$filter",
            "startswith(evergrn_name, 'O''Brien') or endswith(evergrn_name, 'O''Brien') or evergrn_name eq 'O''Brien'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{ "evergrn_name": "o'brien" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = client_for(&server)
        .find_tag_definitions("O'Brien")
        .await
        .unwrap();

    assert_eq!(found, vec!["o'brien".to_string()]);
}

#[tokio::test]
async fn test_create_tag_definition_reads_entity_id_header() {
    let server = MockServer::start().await;
    let entity_id = format!(
        "{}{API}/evergrn_tagdefinitions(11111111-2222-3333-4444-555555555555)",
        server.uri()
    );

    Mock::given(method("POST"))
        .and(path(format!("{API}/evergrn_tagdefinitions")))
        .and(body_json(serde_json::json!({ "evergrn_name": "Roadmap" })))
        .respond_with(ResponseTemplate::new(204).insert_header("OData-EntityId", entity_id.as_str()))
        .expect(1)
        .mount(&server)
        .await;

    let id = client_for(&server)
        .create_tag_definition("Roadmap")
        .await
        .unwrap();

    assert_eq!(id, "11111111-2222-3333-4444-555555555555");
}

#[tokio::test]
async fn test_create_tag_definition_reads_body_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/evergrn_tagdefinitions")))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "evergrn_tagdefinitionid": "abc",
            "evergrn_name": "Roadmap"
        })))
        .mount(&server)
        .await;

    let id = client_for(&server)
        .create_tag_definition("Roadmap")
        .await
        .unwrap();

    assert_eq!(id, "abc");
}

#[tokio::test]
async fn test_list_tag_policies_filters_by_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_tagsettingses")))
        .and(query_param("$filter", "evergrn_entityname eq 2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                { "evergrn_entityname": 2, "evergrn_allowtagcreation": 1 },
                { "evergrn_entityname": 2, "evergrn_allowtagcreation": false }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client_for(&server)
        .list_tag_policies(PolicyKey(2))
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].entity_key, 2);
    assert!(rows[0].allow_tag_creation);
    assert!(!rows[1].allow_tag_creation);
}

#[tokio::test]
async fn test_get_tag_field_null_and_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_cases(c1)")))
        .and(query_param("$select", "evergrn_tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "evergrn_tags": "Billing,Vip"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_cases(c2)")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "evergrn_tags": null
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let c1 = client
        .get_tag_field(&RecordRef::new("evergrn_case", "c1"))
        .await
        .unwrap();
    let c2 = client
        .get_tag_field(&RecordRef::new("evergrn_case", "c2"))
        .await
        .unwrap();

    assert_eq!(c1.as_deref(), Some("Billing,Vip"));
    assert_eq!(c2, None);
}

#[tokio::test]
async fn test_get_tag_field_deleted_record_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_cases(gone)")))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": { "code": "0x80040217", "message": "evergrn_case With Id = gone Does Not Exist" }
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_tag_field(&RecordRef::new("evergrn_case", "gone"))
        .await;

    match result {
        Err(Error::NotFound(message)) => assert!(message.contains("Does Not Exist")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_tag_field_patches_with_if_match() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{API}/evergrn_cases(c1)")))
        .and(header("If-Match", "*"))
        .and(body_json(serde_json::json!({ "evergrn_tags": "" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .update_tag_field(&RecordRef::new("evergrn_case", "c1"), "")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_status_mapping_for_auth_and_throttle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_tagdefinitions")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/evergrn_tagsettingses")))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert!(matches!(
        client.list_tag_definitions().await,
        Err(Error::Config(_))
    ));
    match client.list_tag_policies(PolicyKey(0)).await {
        Err(Error::Remote { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "Rate limit exceeded");
        }
        other => panic!("Expected Remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_custom_schema_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/acme_tagdefinitions")))
        .and(query_param("$select", "acme_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{ "acme_name": "Alpha" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = DataverseConfig::new(server.uri());
    config.schema = tagkit_core::SchemaNames::new("acme");
    let client = DataverseClient::new(config).unwrap();

    assert_eq!(client.list_tag_definitions().await.unwrap(), vec!["Alpha".to_string()]);
}
