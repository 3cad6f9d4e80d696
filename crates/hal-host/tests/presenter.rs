//! Presenting handler results for a small meeting-room API.

use hal_host::{
    HalConfig, HalPresenter, PagedResult, Payload, Presented, RequestContext, RequestUrl,
    HAL_JSON_CONTENT_TYPE,
};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
struct Room {
    id: u32,
    name: &'static str,
    seats: u32,
}

fn rooms() -> Vec<Room> {
    [
        ("Mercury", 10),
        ("Venus", 8),
        ("Earth", 15),
        ("Mars", 14),
        ("Jupiter", 30),
        ("Saturn", 25),
        ("Uranus", 18),
        ("Neptune", 20),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, seats), id)| Room { id, name, seats })
    .collect()
}

fn presenter(config: HalConfig) -> HalPresenter {
    HalPresenter::new(config).with_item_path(|id| Some(format!("/api/meetingrooms/get-by-id/{id}")))
}

fn context(url: &str) -> RequestContext {
    RequestContext::new(RequestUrl::parse(url).unwrap()).with_collection("MeetingRooms")
}

fn hal_body(presented: Presented) -> Value {
    match presented {
        Presented::Hal(response) => {
            assert_eq!(response.content_type, HAL_JSON_CONTENT_TYPE);
            serde_json::from_slice(&response.body).unwrap()
        }
        other => panic!("expected a HAL response, got {other:?}"),
    }
}

fn page_of(page: u64, size: u64) -> Payload {
    Payload::paged(PagedResult::paginate(rooms(), page, size)).unwrap()
}

#[test]
fn middle_page_renders_full_document() {
    let base = "http://localhost:5000/api/meetingrooms";
    let presented = presenter(HalConfig::default())
        .present(200, page_of(2, 3), &context(&format!("{base}?size=3&page=2")))
        .unwrap();

    let Presented::Hal(response) = presented else {
        panic!("expected a HAL response");
    };
    assert_eq!(response.status, 200);

    let expected = json!({
        "_links": {
            "self": {"href": format!("{base}?size=3&page=2")},
            "first": {"href": format!("{base}?size=3&page=1")},
            "last": {"href": format!("{base}?size=3&page=3")},
            "prev": {"href": format!("{base}?size=3&page=1")},
            "next": {"href": format!("{base}?size=3&page=3")}
        },
        "page": {"number": 2, "size": 3, "totalElements": 8, "totalPages": 3},
        "_embedded": {
            "meetingRooms": [
                {"id": 4, "name": "Mars", "seats": 14,
                 "_links": {"self": {"href": "http://localhost:5000/api/meetingrooms/get-by-id/4"}}},
                {"id": 5, "name": "Jupiter", "seats": 30,
                 "_links": {"self": {"href": "http://localhost:5000/api/meetingrooms/get-by-id/5"}}},
                {"id": 6, "name": "Saturn", "seats": 25,
                 "_links": {"self": {"href": "http://localhost:5000/api/meetingrooms/get-by-id/6"}}}
            ]
        }
    });
    assert_eq!(response.text(), serde_json::to_string(&expected).unwrap());
}

#[test]
fn first_page_has_no_prev_and_last_page_has_no_next() {
    let presenter = presenter(HalConfig::default());

    let first = hal_body(
        presenter
            .present(200, page_of(1, 3), &context("http://h/api/meetingrooms"))
            .unwrap(),
    );
    assert!(first["_links"].get("prev").is_none());
    assert_eq!(first["_links"]["next"]["href"], "http://h/api/meetingrooms?page=2");
    assert_eq!(first["_links"]["first"]["href"], "http://h/api/meetingrooms?page=1");

    let last = hal_body(
        presenter
            .present(200, page_of(3, 3), &context("http://h/api/meetingrooms?page=3"))
            .unwrap(),
    );
    assert!(last["_links"].get("next").is_none());
    assert_eq!(last["_links"]["prev"]["href"], "http://h/api/meetingrooms?page=2");
    assert_eq!(last["_embedded"]["meetingRooms"].as_array().unwrap().len(), 2);
}

#[test]
fn page_past_the_end_has_neither_prev_nor_next() {
    let body = hal_body(
        presenter(HalConfig::default())
            .present(200, page_of(9, 3), &context("http://h/api/meetingrooms?page=9"))
            .unwrap(),
    );
    assert!(body["_links"].get("prev").is_none());
    assert!(body["_links"].get("next").is_none());
    assert_eq!(body["_embedded"]["meetingRooms"], json!([]));
}

#[test]
fn self_link_is_the_request_url_as_received() {
    let raw = "http://h/api/meetingrooms?flag&name=Mars%20One&tag=a+b&page=2";
    let body = hal_body(
        presenter(HalConfig::default())
            .present(200, page_of(2, 3), &context(raw))
            .unwrap(),
    );
    assert_eq!(body["_links"]["self"]["href"], raw);
    assert_eq!(
        body["_links"]["next"]["href"],
        "http://h/api/meetingrooms?flag=&name=Mars+One&tag=a+b&page=3"
    );
}

#[test]
fn collection_renders_count_and_items() {
    let matches: Vec<Room> = rooms().into_iter().filter(|r| r.name.contains("ar")).collect();
    let body = hal_body(
        presenter(HalConfig::default())
            .present(
                200,
                Payload::collection(matches).unwrap(),
                &context("http://h/api/meetingrooms/get-by-name/ar"),
            )
            .unwrap(),
    );

    assert_eq!(body["count"], 2);
    assert_eq!(body["_links"]["self"]["href"], "http://h/api/meetingrooms/get-by-name/ar");
    let items = body["_embedded"]["meetingRooms"].as_array().unwrap();
    let names: Vec<&str> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Earth", "Mars"]);
    assert_eq!(
        items[1]["_links"]["self"]["href"],
        "http://h/api/meetingrooms/get-by-id/4"
    );
}

#[test]
fn single_object_gets_self_link() {
    let room = rooms().remove(2);
    let body = hal_body(
        presenter(HalConfig::default())
            .present(200, Payload::object(&room).unwrap(), &context("http://h/api/meetingrooms/3"))
            .unwrap(),
    );
    assert_eq!(
        body,
        json!({
            "_links": {"self": {"href": "http://h/api/meetingrooms/3"}},
            "id": 3, "name": "Earth", "seats": 15
        })
    );
}

#[test]
fn created_object_links_to_its_location() {
    let ctx = context("http://h/api/meetingrooms").with_created_at("http://h/api/meetingrooms/9");
    let body = hal_body(
        presenter(HalConfig::default())
            .present(201, Payload::object(json!({"id": 9, "name": "Pluto"})).unwrap(), &ctx)
            .unwrap(),
    );
    assert_eq!(body["_links"]["self"]["href"], "http://h/api/meetingrooms/9");
}

#[test]
fn error_statuses_pass_through() {
    let payload = Payload::object("Meeting Room Id 42 doesn't exist.").unwrap();
    let presented = presenter(HalConfig::default())
        .present(404, payload.clone(), &context("http://h/api/meetingrooms/42"))
        .unwrap();
    assert_eq!(presented, Presented::PassThrough { status: 404, payload });
}

#[test]
fn disabled_hal_wraps_pages_in_an_envelope() {
    let mut config = HalConfig::default();
    config.hal.enabled = false;

    let presented = presenter(config.clone())
        .present(200, page_of(1, 2), &context("http://h/api/meetingrooms?size=2"))
        .unwrap();
    let response = presented.into_response().unwrap();
    let expected = json!({
        "page": 1, "size": 2, "totalPages": 4, "totalCount": 8,
        "meetingRooms": [
            {"id": 1, "name": "Mercury", "seats": 10},
            {"id": 2, "name": "Venus", "seats": 8}
        ]
    });
    assert_eq!(response.text(), serde_json::to_string(&expected).unwrap());

    let object = Payload::object(json!({"id": 1})).unwrap();
    let presented = presenter(config)
        .present(200, object.clone(), &context("http://h/api/meetingrooms/1"))
        .unwrap();
    assert_eq!(presented, Presented::PassThrough { status: 200, payload: object });
}

#[test]
fn https_policy_applies_to_generated_links_only() {
    let config = HalConfig::from_toml_str("[hal]\nuse_https_scheme = true").unwrap();
    let body = hal_body(
        presenter(config)
            .present(200, page_of(1, 4), &context("http://h/api/meetingrooms"))
            .unwrap(),
    );
    assert_eq!(body["_links"]["self"]["href"], "http://h/api/meetingrooms");
    assert_eq!(body["_links"]["last"]["href"], "https://h/api/meetingrooms?page=2");
    assert_eq!(
        body["_embedded"]["meetingRooms"][0]["_links"]["self"]["href"],
        "https://h/api/meetingrooms/get-by-id/1"
    );
}

#[test]
fn custom_id_property_and_serializer_options() {
    let config = HalConfig::from_yaml_str(
        "hal:\n  id_property_name: room_code\nserializer:\n  naming_convention: camel_case\n  formatting: indented\n",
    )
    .unwrap();
    let items = vec![json!({"room_code": "A1", "floor_level": 2})];
    let presented = HalPresenter::new(config)
        .present(200, Payload::Collection(items), &context("http://h/rooms"))
        .unwrap();

    let Presented::Hal(response) = presented else {
        panic!("expected a HAL response");
    };
    let text = response.text();
    assert!(text.contains('\n'));
    let body: Value = serde_json::from_str(&text).unwrap();
    let item = &body["_embedded"]["meetingRooms"][0];
    assert_eq!(item["roomCode"], "A1");
    assert_eq!(item["floorLevel"], 2);
    assert_eq!(item["_links"]["self"]["href"], "http://h/rooms");
}
