use ev_dashboard::config::DashboardConfig;
use ev_dashboard::data::{DataLoader, LoaderError};
use ev_dashboard::stats::{Aggregator, KeyMetrics, RegionSalesVsStations};
use ev_dashboard::views::{Selection, View, ViewData};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SALES_CSV: &str = "\
region,category,parameter,mode,powertrain,year,unit,value
West,Historical,EV Sales,Cars,BEV,2022,Vehicles,100
West,Historical,EV Sales,Cars,BEV,2023,Vehicles,160
West,Historical,EV Sales,Buses,BEV,2022,Vehicles,25
West,Historical,EV stock,Cars,BEV,2022,Vehicles,900
East,Historical,EV Sales,Cars,PHEV,2022,Vehicles,40
East,Historical,EV Sales,Cars,BEV,2023,Vehicles,
Island,Historical,EV Sales,Cars,BEV,2023,Vehicles,15
";

const STATIONS_CSV: &str = "\
StationID,region,AvgWaitTime,TotalSessions
S1,West,10 min,5
S2,West,20 minutes,15
S3,East,unknown,8
S4,East,30 min,2
";

const REGIONAL_CSV: &str = "\
region,ExistingStations,EV_AdoptionRate
West,12,0.3
East,4,0.1
North,3,0.05
";

fn write_inputs(dir: &Path) -> DashboardConfig {
    fs::write(dir.join("clean_ev_sales.csv"), SALES_CSV).unwrap();
    fs::write(dir.join("clean_station_usage.csv"), STATIONS_CSV).unwrap();
    fs::write(dir.join("clean_regional_factors_1.csv"), REGIONAL_CSV).unwrap();
    fs::write(
        dir.join("eda_output.html"),
        "<html><head><title>EV EDA</title></head><body><h2>Sales</h2><p>West leads</p></body></html>",
    )
    .unwrap();

    DashboardConfig {
        data_dir: Some(dir.to_path_buf()),
        ..DashboardConfig::default()
    }
}

fn setup() -> (TempDir, DashboardConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = write_inputs(dir.path());
    (dir, config)
}

#[test]
fn loads_and_cleans_all_tables() {
    let (_dir, config) = setup();
    let ds = DataLoader::load(&config.data_paths()).unwrap();

    let report = ds.report();
    assert_eq!(report.raw_sales_rows, 7);
    assert_eq!(report.kept_sales_rows, 5);
    assert_eq!(report.other_parameter_rows, 1);
    assert_eq!(report.missing_value_rows, 1);
    assert_eq!(report.unparsed_wait_times, 1);

    assert_eq!(ds.sales_regions(), vec!["East", "Island", "West"]);
    assert_eq!(ds.sales_years(), vec![2022, 2023]);
}

#[test]
fn metrics_match_hand_computed_values() {
    let (_dir, config) = setup();
    let ds = DataLoader::load(&config.data_paths()).unwrap();

    assert_eq!(
        Aggregator::key_metrics(&ds, "West", 2022).unwrap(),
        KeyMetrics {
            total_sales: 125.0,
            avg_wait_minutes: Some(15.0),
            total_sessions: 20,
        }
    );
    assert_eq!(
        Aggregator::key_metrics(&ds, "East", 2022).unwrap(),
        KeyMetrics {
            total_sales: 40.0,
            avg_wait_minutes: Some(30.0),
            total_sessions: 10,
        }
    );
    assert_eq!(
        Aggregator::key_metrics(&ds, "Island", 2022).unwrap(),
        KeyMetrics {
            total_sales: 0.0,
            avg_wait_minutes: None,
            total_sessions: 0,
        }
    );
}

#[test]
fn key_insights_use_inner_joins() {
    let (_dir, config) = setup();
    let ds = DataLoader::load(&config.data_paths()).unwrap();

    let ViewData::KeyInsights(insights) =
        ViewData::compute(View::KeyInsights, &ds, None, &config).unwrap()
    else {
        panic!("expected key insights");
    };

    assert_eq!(
        insights.sales_vs_stations.rows,
        vec![
            RegionSalesVsStations {
                region: "East".to_string(),
                ev_sales: 40.0,
                existing_stations: 4,
            },
            RegionSalesVsStations {
                region: "West".to_string(),
                ev_sales: 285.0,
                existing_stations: 12,
            },
        ]
    );
    assert_eq!(insights.sales_vs_stations.diagnostics.left_only, vec!["Island"]);
    assert_eq!(insights.sales_vs_stations.diagnostics.right_only, vec!["North"]);

    let adoption = &insights.adoption_vs_wait;
    assert_eq!(adoption.joined.rows.len(), 2);
    let fit = adoption.fit.unwrap();
    // East (0.1, 30) and West (0.3, 15)
    assert!((fit.slope - -75.0).abs() < 1e-6);
    assert!((fit.intercept - 37.5).abs() < 1e-6);
}

#[test]
fn interactive_and_eda_views_render_data() {
    let (_dir, config) = setup();
    let ds = DataLoader::load(&config.data_paths()).unwrap();

    let selection = Selection::initial(&ds).unwrap();
    assert_eq!(selection.region, "East");
    assert_eq!(selection.year, 2022);

    let ViewData::Interactive(view) =
        ViewData::compute(View::InteractiveVisuals, &ds, Some(&selection), &config).unwrap()
    else {
        panic!("expected interactive data");
    };
    assert_eq!(view.metrics.total_sales, 40.0);
    assert_eq!(view.station_load.len(), 2);
    assert_eq!(view.station_load[0].wait_minutes, None);

    let ViewData::EdaSummary(report) =
        ViewData::compute(View::EdaSummary, &ds, None, &config).unwrap()
    else {
        panic!("expected eda report");
    };
    assert_eq!(report.title().as_deref(), Some("EV EDA"));
    assert_eq!(report.text_preview(), "EV EDA\nSales\nWest leads");
}

#[test]
fn missing_input_file_is_fatal() {
    let (dir, config) = setup();
    fs::remove_file(dir.path().join("clean_station_usage.csv")).unwrap();

    let err = DataLoader::load(&config.data_paths()).unwrap_err();
    assert!(matches!(err, LoaderError::MissingFile { table: "station usage", .. }));
    assert!(err.to_string().contains("clean_station_usage.csv"));
}
