//! Small datasets shared by the tests of this crate.

use eva_data::date_range::YearMonth;
use eva_data::loader::{load_incentives, load_sales_table, load_stations};
use eva_data::sales::{Powertrain, SalesDataset};
use eva_data::Datasets;

pub fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month - 1).unwrap()
}

pub fn sample_datasets() -> Datasets {
    let sales = SalesDataset {
        bev: load_sales_table(
            Powertrain::Bev,
            "stateName,2016,2017\nCalifornia,1200,2400\nOhio,36,48\n",
        )
        .unwrap(),
        hev: load_sales_table(Powertrain::Hev, "stateName,2016,2017\nCalifornia,120,240\n").unwrap(),
        phev: load_sales_table(Powertrain::Phev, "stateName,2016,2017\nCalifornia,24,48\n").unwrap(),
    };
    let stations = load_stations(
        r#"{
        "California": [
            {"Open Date": "2016-03-15", "Latitude": 34.05, "Longitude": -118.25},
            {"Open Date": "2017-06-01", "Latitude": 37.77, "Longitude": -122.42}
        ],
        "Nevada": [
            {"Open Date": "2016-08-01", "Latitude": 36.17, "Longitude": -115.14}
        ]
    }"#,
    )
    .unwrap();
    let incentives = load_incentives(
        r#"{
        "Nevada": [
            {"Date": "2016-01-20", "Category": "State Incentives", "Project Name": "Charger Grant",
             "Types Supported": "ELEC"}
        ],
        "California": [
            {"Date": "2017-02-01", "Category": "Laws and Regulations", "Project Name": "ZEV Mandate",
             "Types Supported": "ELEC|PHEV"}
        ]
    }"#,
    )
    .unwrap();
    Datasets::new(Some(sales), Some(stations), Some(incentives))
}
