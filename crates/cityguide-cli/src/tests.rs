use clap::Parser;
use cityguide_core::{
    CatalogEntry, Coordinate, Distance, Location, LocationId, LocationKind, MapCoordinatePicker,
    MapView,
};

use super::{Cli, Commands};
use crate::catalog::format_entry;
use crate::create::{parse_click, ScriptedMap};

#[test]
fn config_can_be_built_from_a_custom_lookup() {
    let config = cityguide_core::build_app_config(|key| match key {
        "CITYGUIDE_USER_POSITION" => Ok("47.99,37.81".to_owned()),
        _ => Err(std::env::VarError::NotPresent),
    })
    .unwrap();
    assert_eq!(config.user_position, Coordinate::new(47.99, 37.81));
    assert_eq!(config.map_zoom, 15);
}

#[test]
fn parses_catalog_with_query_and_position() {
    let cli = Cli::try_parse_from([
        "cityguide",
        "catalog",
        "--query",
        "донб",
        "--near",
        "47.99,37.81",
        "--nearest",
    ])
    .unwrap();
    match cli.command {
        Commands::Catalog(args) => {
            assert_eq!(args.query, "донб");
            assert_eq!(args.near, Some(Coordinate::new(47.99, 37.81)));
            assert!(args.nearest);
            assert!(!args.ratings);
        }
        other => panic!("expected catalog, got {other:?}"),
    }
}

#[test]
fn catalog_rejects_out_of_range_position() {
    let result = Cli::try_parse_from(["cityguide", "catalog", "--near", "91,37.8"]);
    assert!(result.is_err());
}

#[test]
fn rate_rejects_six_stars() {
    assert!(Cli::try_parse_from(["cityguide", "rate", "1", "6"]).is_err());
    assert!(Cli::try_parse_from(["cityguide", "rate", "1", "5"]).is_ok());
}

#[test]
fn add_collects_repeated_clicks() {
    let cli = Cli::try_parse_from([
        "cityguide",
        "add",
        "--name",
        "Хмели сунели",
        "--kind",
        "restaurant",
        "--click",
        "48.0,37.8",
        "--click",
        "999,37.8",
    ])
    .unwrap();
    match cli.command {
        Commands::Add(args) => {
            assert_eq!(args.kind, LocationKind::Restaurant);
            assert_eq!(
                args.clicks,
                vec![Coordinate::new(48.0, 37.8), Coordinate::new(999.0, 37.8)]
            );
        }
        other => panic!("expected add, got {other:?}"),
    }
}

#[test]
fn parse_click_accepts_negative_values() {
    assert_eq!(
        parse_click("-33.86, 151.2").unwrap(),
        Coordinate::new(-33.86, 151.2)
    );
    assert!(parse_click("somewhere").is_err());
}

#[test]
fn scripted_map_keeps_last_valid_click() {
    let center = Coordinate::new(48.016_011, 37.802_773);
    let mut map = ScriptedMap::default();
    let picker = MapCoordinatePicker::attach(&mut map, MapView::new(center, 15).unwrap());

    map.replay(&[Coordinate::new(48.0, 37.8), Coordinate::new(999.0, 37.8)]);

    assert_eq!(map.view.map(|v| v.zoom), Some(15));
    assert_eq!(picker.current_coordinate(), Coordinate::new(48.0, 37.8));
}

#[test]
fn scripted_map_without_clicks_uses_center() {
    let center = Coordinate::new(48.016_011, 37.802_773);
    let mut map = ScriptedMap::default();
    let picker = MapCoordinatePicker::attach(&mut map, MapView::new(center, 15).unwrap());
    map.replay(&[]);
    assert_eq!(picker.current_coordinate(), center);
}

#[test]
fn entry_line_shows_rating_placeholder_and_distance() {
    let loc = Location::new(
        LocationId::new("1"),
        "Донбасс арена",
        Some(Coordinate::new(48.0, 37.8)),
    );
    let entry = CatalogEntry::new(loc, Coordinate::new(48.0, 37.8));
    assert_eq!(entry.distance, Distance::Km(0.0));
    let line = format_entry(&entry);
    assert!(line.contains("Донбасс арена"));
    assert!(line.contains("★ —"));
    assert!(line.ends_with("0.0 км"));
}
