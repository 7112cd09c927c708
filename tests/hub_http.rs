// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the Home Center HTTP client using wiremock.

use fibaro_bridge::HubError;
use fibaro_bridge::hub::{HttpHubClient, HubClient, HubConfig};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(mock_server: &MockServer) -> HttpHubClient {
    HubConfig::new(mock_server.uri())
        .with_credentials("admin", "secret")
        .into_client()
        .unwrap()
}

// ============================================================================
// Reads
// ============================================================================

mod reads {
    use super::*;

    #[tokio::test]
    async fn get_devices_decodes_device_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/devices"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 5, "name": "Lamp", "roomID": 1,
                    "type": "com.fibaro.binarySwitch", "visible": true,
                    "properties": {"value": "true", "deviceControlType": "2"}
                },
                {
                    "id": 9, "name": "Panel", "roomID": 2,
                    "type": "virtual_device", "visible": false,
                    "properties": {"rows": [
                        {"type": "button", "elements": [{"id": 1, "caption": "Open"}]}
                    ]}
                }
            ])))
            .mount(&mock_server)
            .await;

        let devices = client_for(&mock_server).get_devices().await.unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].device_type, "com.fibaro.binarySwitch");
        assert_eq!(devices[0].properties.control_type().as_deref(), Some("2"));
        assert!(!devices[1].visible);
        assert_eq!(devices[1].properties.rows()[0].elements[0].caption, "Open");
    }

    #[tokio::test]
    async fn get_scenes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/scenes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 11, "name": "SetAwayArmed"},
                {"id": 12, "name": "SetDisarmed"}
            ])))
            .mount(&mock_server)
            .await;

        let scenes = client_for(&mock_server).get_scenes().await.unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[1].name, "SetDisarmed");
    }

    #[tokio::test]
    async fn get_device_properties() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/devices/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 12, "name": "Heater", "roomID": 3,
                "type": "com.fibaro.thermostatDanfoss",
                "properties": {"value": "19.5", "targetLevel": 22}
            })))
            .mount(&mock_server)
            .await;

        let properties = client_for(&mock_server)
            .get_device_properties(12)
            .await
            .unwrap();
        assert_eq!(properties.as_f64("value"), Some(19.5));
        assert_eq!(properties.as_f64("targetLevel"), Some(22.0));
    }

    #[tokio::test]
    async fn missing_device_maps_to_device_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/devices/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .get_device_properties(404)
            .await
            .unwrap_err();
        assert!(matches!(err, HubError::DeviceNotFound(404)));
    }

    #[tokio::test]
    async fn get_global_variable_returns_value_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/globalVariables/SecuritySystem"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "SecuritySystem",
                "value": "AwayArmed"
            })))
            .mount(&mock_server)
            .await;

        let value = client_for(&mock_server)
            .get_global_variable("SecuritySystem")
            .await
            .unwrap();
        assert_eq!(value, "AwayArmed");
    }
}

// ============================================================================
// Writes
// ============================================================================

mod writes {
    use super::*;

    #[tokio::test]
    async fn set_device_property_posts_action_args() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/devices/7/action/setColor"))
            .and(body_json(json!({"args": [255, 0, 0, 0]})))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&mock_server)
            .await;

        client_for(&mock_server)
            .set_device_property(7, "setColor", vec![json!(255), json!(0), json!(0), json!(0)])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn set_global_variable_puts_value() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/globalVariables/Vacation"))
            .and(body_json(json!({"name": "Vacation", "value": "true"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        client_for(&mock_server)
            .set_global_variable("Vacation", "true")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn run_scene_posts_start() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/scenes/11/action/start"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&mock_server)
            .await;

        client_for(&mock_server).run_scene(11).await.unwrap();
    }
}

// ============================================================================
// Failures
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_failed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/devices"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).get_devices().await.unwrap_err();
        assert!(matches!(err, HubError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/scenes"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).get_scenes().await.unwrap_err();
        assert!(matches!(err, HubError::Status { code: 503, .. }));
    }

    #[tokio::test]
    async fn unreachable_hub_maps_to_connection_failed() {
        let client = HubConfig::new("http://127.0.0.1:1").into_client().unwrap();

        let err = client.get_devices().await.unwrap_err();
        assert!(matches!(err, HubError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_an_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/devices"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).get_devices().await.unwrap_err();
        assert!(matches!(err, HubError::Http(_)));
    }
}
