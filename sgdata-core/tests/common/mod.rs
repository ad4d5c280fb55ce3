//! Shared fixtures for the integration tests.
//!
//! Each test builds its own mock server and client; the client releases its
//! transport when the test drops it, closed or not.

#![allow(dead_code)]

use serde_json::{Value, json};
use sgdata_core::{Config, SgDataClient};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Fresh client pointed at `server`, with default endpoint paths.
pub fn client_for(server: &MockServer) -> SgDataClient {
    let config = Config { base_url: server.uri(), timeout_secs: 5, ..Config::default() };
    SgDataClient::from_config(config).expect("Failed to build test client")
}

/// Mount a GET mock answering `route` with `status` and a JSON body.
pub async fn mount_json(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub fn sample_psi_data() -> Value {
    json!({
        "region_metadata": [
            {"name": "west", "label_location": {"latitude": 1.35735, "longitude": 103.7}},
            {"name": "national", "label_location": {"latitude": 0, "longitude": 0}},
            {"name": "east", "label_location": {"latitude": 1.35735, "longitude": 103.94}},
            {"name": "central", "label_location": {"latitude": 1.35735, "longitude": 103.82}},
            {"name": "south", "label_location": {"latitude": 1.29587, "longitude": 103.82}},
            {"name": "north", "label_location": {"latitude": 1.41803, "longitude": 103.82}}
        ],
        "items": [
            {
                "timestamp": "2024-01-15T12:00:00+08:00",
                "update_timestamp": "2024-01-15T12:06:00+08:00",
                "readings": {
                    "o3_sub_index": {"west": 15, "national": 18, "east": 18, "central": 16, "south": 14, "north": 20},
                    "pm10_twenty_four_hourly": {"west": 25, "national": 28, "east": 27, "central": 24, "south": 22, "north": 30},
                    "pm10_sub_index": {"west": 25, "national": 28, "east": 27, "central": 24, "south": 22, "north": 30},
                    "co_sub_index": {"west": 3, "national": 4, "east": 4, "central": 3, "south": 3, "north": 4},
                    "pm25_twenty_four_hourly": {"west": 12, "national": 14, "east": 13, "central": 11, "south": 10, "north": 15},
                    "so2_sub_index": {"west": 2, "national": 3, "east": 2, "central": 2, "south": 2, "north": 3},
                    "co_eight_hour_max": {"west": 0.33, "national": 0.41, "east": 0.38, "central": 0.35, "south": 0.31, "north": 0.44},
                    "no2_one_hour_max": {"west": 12, "national": 15, "east": 14, "central": 13, "south": 11, "north": 16},
                    "so2_twenty_four_hourly": {"west": 3, "national": 4, "east": 3, "central": 3, "south": 3, "north": 4},
                    "pm25_sub_index": {"west": 50, "national": 58, "east": 54, "central": 46, "south": 42, "north": 62},
                    "psi_twenty_four_hourly": {"west": 50, "national": 58, "east": 54, "central": 46, "south": 42, "north": 62},
                    "o3_eight_hour_max": {"west": 18, "national": 22, "east": 21, "central": 19, "south": 17, "north": 24}
                }
            }
        ],
        "api_info": {"status": "healthy"}
    })
}

pub fn sample_weather_forecast_data() -> Value {
    json!({
        "area_metadata": [
            {"name": "Ang Mo Kio", "label_location": {"latitude": 1.375, "longitude": 103.839}},
            {"name": "Bedok", "label_location": {"latitude": 1.321, "longitude": 103.924}},
            {"name": "Bishan", "label_location": {"latitude": 1.350772, "longitude": 103.839}}
        ],
        "items": [
            {
                "update_timestamp": "2024-01-15T12:00:00+08:00",
                "timestamp": "2024-01-15T12:00:00+08:00",
                "valid_period": {
                    "start": "2024-01-15T12:00:00+08:00",
                    "end": "2024-01-15T14:00:00+08:00"
                },
                "forecasts": [
                    {"area": "Ang Mo Kio", "forecast": "Partly Cloudy"},
                    {"area": "Bedok", "forecast": "Partly Cloudy"},
                    {"area": "Bishan", "forecast": "Light Rain"}
                ]
            }
        ],
        "api_info": {"status": "healthy"}
    })
}

pub fn sample_carpark_data() -> Value {
    json!({
        "items": [
            {
                "timestamp": "2024-01-15T12:00:00+08:00",
                "carpark_data": [
                    {
                        "carpark_info": [
                            {"total_lots": "100", "lot_type": "C", "lots_available": "50"}
                        ],
                        "carpark_number": "HG1",
                        "update_datetime": "2024-01-15T12:00:00"
                    },
                    {
                        "carpark_info": [
                            {"total_lots": "200", "lot_type": "C", "lots_available": "120"}
                        ],
                        "carpark_number": "HG2",
                        "update_datetime": "2024-01-15T12:00:00"
                    }
                ]
            }
        ],
        "api_info": {"status": "healthy"}
    })
}
