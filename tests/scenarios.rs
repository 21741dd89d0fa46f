use courier_routing::api::RouteService;
use courier_routing::config::OptimizerConfig;
use courier_routing::distance::DistanceMatrix;
use courier_routing::evaluation::{format_clock, parse_clock, schedule_route};
use courier_routing::models::{AddressType, Coordinate, Delivery};
use courier_routing::optimizer::RouteOptimizer;
use courier_routing::Error;

fn three_deliveries() -> Vec<Delivery> {
    vec![
        Delivery::new("ORD1001", Coordinate::new(17.50, 78.50), AddressType::Residential),
        Delivery::new("ORD1002", Coordinate::new(17.51, 78.52), AddressType::Commercial),
        Delivery::new("ORD1003", Coordinate::new(17.49, 78.48), AddressType::Residential),
    ]
}

#[test]
fn one_courier_visits_all_three() {
    let ds = three_deliveries();
    let optimizer = RouteOptimizer::new(OptimizerConfig::default().with_implicit_depot(false))
        .expect("valid config");
    let plan = optimizer.optimize(&ds, 1, None).expect("valid input");

    assert_eq!(plan.total_couriers(), 1);
    let route = &plan.routes()[0];
    assert_eq!(route.delivery_count(), 3);
    assert!(plan.total_distance_km() > 0.0);

    let mut indices: Vec<usize> = route
        .deliveries()
        .map(|d| ds.iter().position(|x| x.id() == d.id()).expect("known delivery"))
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn two_couriers_share_three_deliveries() {
    let ds = three_deliveries();
    let plan = RouteOptimizer::default().optimize(&ds, 2, None).expect("valid input");
    assert!(plan.total_couriers() <= 2);
    assert_eq!(plan.total_deliveries(), 3);
}

#[test]
fn empty_input_fails() {
    let err = RouteOptimizer::default().optimize(&[], 1, None).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
}

#[test]
fn eta_for_one_residential_stop() {
    let resp = RouteService::default().handle_calculate_eta(
        r#"{"route": [{"travel_time_minutes": 15, "address_type": 0}], "start_time": "10:00"}"#,
    );
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["route_with_eta"][0]["eta"], "10:15");
    assert_eq!(resp.body["start_time"], "10:00");
    assert_eq!(resp.body["end_time"], "10:20");
}

#[test]
fn optimized_route_feeds_eta() {
    let ds = three_deliveries();
    let plan = RouteOptimizer::default().optimize(&ds, 1, None).expect("valid input");
    let route = &plan.routes()[0];
    let schedule = schedule_route(route, parse_clock("09:00").expect("valid")).expect("valid legs");

    assert_eq!(schedule.stops.len(), route.stops().len());
    // Depot leg is zero, so the first ETA is the start time.
    assert_eq!(format_clock(schedule.stops[0].arrival), "09:00");
    let expected = route.statistics().completion_minutes;
    assert!((schedule.end_offset_minutes - expected).abs() < 1e-9);
}

#[test]
fn optimized_route_round_trips_through_eta() {
    let body = r#"{
        "deliveries": [
            {"order_id": "ORD1001", "latitude": 17.50, "longitude": 78.50, "address_type": 0},
            {"order_id": "ORD1002", "latitude": 17.51, "longitude": 78.52, "address_type": 1},
            {"order_id": "ORD1003", "latitude": 17.49, "longitude": 78.48, "address_type": 0}
        ]
    }"#;
    let service = RouteService::default();
    let optimized = service.handle_optimize_routes(body);
    assert_eq!(optimized.status, 200);
    let route = optimized.body["routes"][0]["route"].clone();
    assert_eq!(route[0]["type"], "depot");

    let eta_body = serde_json::json!({ "route": route, "start_time": "10:00" });
    let etas = service.handle_calculate_eta(&eta_body.to_string());
    assert_eq!(etas.status, 200);
    assert_eq!(etas.body["route_with_eta"][0]["eta"], "10:00");

    let ds = three_deliveries();
    let plan = RouteOptimizer::default().optimize(&ds, 1, None).expect("valid input");
    let schedule =
        schedule_route(&plan.routes()[0], parse_clock("10:00").expect("valid")).expect("valid legs");
    assert_eq!(etas.body["end_time"], format_clock(schedule.end).as_str());
}

#[test]
fn depot_from_request_is_used() {
    let body = r#"{
        "deliveries": [
            {"id": "A", "latitude": 17.50, "longitude": 78.50, "address_type": 0},
            {"id": "B", "latitude": 17.51, "longitude": 78.52, "address_type": 4}
        ],
        "depot_latitude": 17.45,
        "depot_longitude": "78.45"
    }"#;
    let resp = RouteService::default().handle_optimize_routes(body);
    assert_eq!(resp.status, 200);
    let first = &resp.body["routes"][0]["route"][0];
    assert_eq!(first["type"], "depot");
    assert_eq!(first["latitude"], 17.45);
    assert_eq!(first["longitude"], 78.45);
}

#[test]
fn clustered_routes_stay_local() {
    // Two neighbourhoods about 40 km apart; each courier should get one.
    let mut ds = Vec::new();
    for i in 0..6 {
        let off = i as f64 * 0.004;
        ds.push(Delivery::new(format!("N{i}"), Coordinate::new(17.40 + off, 78.40), AddressType::Residential));
        ds.push(Delivery::new(format!("S{i}"), Coordinate::new(17.70 + off, 78.70), AddressType::Commercial));
    }
    let optimizer = RouteOptimizer::new(OptimizerConfig::default().with_implicit_depot(false))
        .expect("valid config");
    let plan = optimizer.optimize(&ds, 2, None).expect("valid input");
    assert_eq!(plan.total_couriers(), 2);
    for route in plan.routes() {
        let prefixes: Vec<char> = route
            .deliveries()
            .filter_map(|d| d.id().chars().next())
            .collect();
        assert!(prefixes.iter().all(|&p| p == prefixes[0]));
        assert_eq!(route.delivery_count(), 6);
    }
}

#[test]
fn route_distance_matches_matrix() {
    let ds = three_deliveries();
    let plan = RouteOptimizer::default().optimize(&ds, 1, None).expect("valid input");
    let route = &plan.routes()[0];
    let points: Vec<Coordinate> = route.stops().iter().map(|s| s.location()).collect();
    let dm = DistanceMatrix::from_coordinates(&points);
    let walked: f64 = (1..points.len()).map(|i| dm.get(i - 1, i)).sum();
    assert!((walked - route.statistics().distance_km).abs() < 1e-9);
}
