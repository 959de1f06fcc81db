use depthdrift::service::{self, BAD_REQUEST_MSG};

#[test]
fn two_urls_yield_two_null_placeholders_in_order() {
    let reply = service::handle_depth_map(r#"{"images": ["a.jpg", "b.jpg"]}"#);
    assert_eq!(reply.status, 200);
    assert_eq!(
        reply.body,
        serde_json::json!({
            "results": [
                { "url": "a.jpg", "depthMap": null },
                { "url": "b.jpg", "depthMap": null }
            ]
        })
    );
}

#[test]
fn empty_array_is_rejected_with_400() {
    let reply = service::handle_depth_map(r#"{"images": []}"#);
    assert_eq!(reply.status, 400);
    assert_eq!(reply.body, serde_json::json!({ "error": BAD_REQUEST_MSG }));
}

#[test]
fn malformed_bodies_are_rejected_with_400() {
    for body in ["", "null", r#"{"images": 42}"#, r#"{"urls": ["a.jpg"]}"#] {
        let reply = service::handle_depth_map(body);
        assert_eq!(reply.status, 400, "body: {body:?}");
        assert_eq!(reply.body["error"], BAD_REQUEST_MSG);
    }
}

#[test]
fn null_depth_map_means_flat_layer_downstream() {
    // The contract: a null depthMap forces depth weight 0 until a real map
    // arrives, which in turn means zero displacement for any pointer.
    use depthdrift::{FieldConfig, Gain, Point, PointerSample, RectPx};

    let reply = service::handle_depth_map(r#"{"images": ["pending.jpg"]}"#);
    assert!(reply.body["results"][0]["depthMap"].is_null());

    let weight = 0.0; // what a null depthMap maps to
    let cfg = FieldConfig {
        gain: Gain::PixelDivisor(20.0),
        max_scale: 15.0,
        falloff: None,
    };
    let sample =
        PointerSample::from_event(Point::new(199.0, 1.0), RectPx::new(0.0, 0.0, 200.0, 100.0))
            .unwrap();
    let d = cfg.displacement(&sample, weight).unwrap();
    assert!(d.is_neutral());
}
