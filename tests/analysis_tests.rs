use rust_decimal::Decimal;
use std::fs;
use tempfile::NamedTempFile;
use tradeflow::dataset::{Column, Dataset};
use tradeflow::query::aggregation::{merge_country_values, percentages};
use tradeflow::query::{
    filter, percentage, top_n, Aggregator, Dimension, Filter, FilterCriteria, Route, Slice,
};
use tradeflow::load_dataset;

fn load(content: &str) -> Dataset {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(&temp_file, content).unwrap();
    load_dataset(temp_file.path().to_str().unwrap()).unwrap()
}

fn three_rows() -> Dataset {
    load(
        "register_id,direction,origin,destination,year,date,product,transport_mode,company_name,total_value
1,Imports,A,B,2015,10/03/2015,Cars,Sea,Acme,100
2,Exports,A,B,2016,11/04/2016,Cars,Air,Acme,50
3,Imports,C,D,2015,12/05/2015,Oil,Sea,Globex,200",
    )
}

fn sample() -> Dataset {
    load(
        "register_id,direction,origin,destination,year,date,product,transport_mode,company_name,total_value
1,Exports,Japan,China,2015,31/01/2015,Cars,Sea,Honda,3000
2,Exports,Japan,China,2016,01/02/2016,Cars,Sea,Honda,1000
3,Exports,Germany,Mexico,2016,15/03/2016,Machinery,Air,Siemens,2500
4,Imports,China,Mexico,2017,20/07/2017,Toys,Sea,Mattel,400
5,Imports,USA,Mexico,2018,05/09/2018,Oil,Rail,Pemex,9000
6,Imports,China,Japan,2018,06/09/2018,Electronics,Sea,Sony,700
7,Exports,Mexico,USA,2019,11/11/2019,Cars,Road,GM,5200
8,Imports,Japan,Mexico,2019,12/12/2019,Cars,Sea,Honda,0",
    )
}

#[test]
fn test_three_row_scenario() {
    let dataset = three_rows();
    let agg = Aggregator::new(Filter::new(&dataset));

    let imports = Slice::new(Some("Imports"), None);
    assert_eq!(agg.total_count(&imports), 2);
    assert_eq!(agg.total_value(&imports), Decimal::from(300));

    let routes: Vec<String> = agg.routes(None).iter().map(|r| r.to_string()).collect();
    assert_eq!(routes, vec!["A-B", "C-D"]);

    let a_b = Dimension::Route("A-B".parse::<Route>().unwrap());
    assert_eq!(
        agg.dimension_frequency(&a_b, &Slice::new(Some("Imports"), Some(2015)))
            .unwrap(),
        1
    );
    assert_eq!(
        agg.dimension_value_sum(&a_b, &Slice::default()).unwrap(),
        Decimal::from(150)
    );
}

#[test]
fn test_empty_filter_is_identity() {
    let dataset = sample();
    let outcome = filter(&dataset, &FilterCriteria::new());

    assert_eq!(outcome.len(), dataset.len());
    for (row, record) in outcome.rows.iter().zip(dataset.records()) {
        assert_eq!(*row, record);
    }
}

#[test]
fn test_valid_categorical_value_matches_every_row() {
    let dataset = sample();

    for column in Column::ALL {
        for value in dataset.unique_values(column) {
            let mut criteria = FilterCriteria::new();
            match column {
                Column::Direction => criteria.direction = Some(value.clone()),
                Column::Origin => criteria.origin = Some(value.clone()),
                Column::Destination => criteria.destination = Some(value.clone()),
                Column::Product => criteria.product = Some(value.clone()),
                Column::TransportMode => criteria.transport_mode = Some(value.clone()),
                Column::CompanyName => criteria.company_name = Some(value.clone()),
            }
            let outcome = filter(&dataset, &criteria);

            assert!(!outcome.is_empty());
            assert!(outcome.rows.iter().all(|tx| column.value_of(tx) == value.as_str()));
            assert!(outcome.skipped.is_empty());
        }
    }
}

#[test]
fn test_invalid_categorical_value_is_identity_with_diagnostic() {
    let dataset = sample();
    let outcome = filter(&dataset, &FilterCriteria::new().company_name("Initech"));

    assert_eq!(outcome.len(), dataset.len());
    assert_eq!(outcome.skipped.len(), 1);
}

#[test]
fn test_direction_partition() {
    let dataset = sample();
    let agg = Aggregator::new(Filter::new(&dataset));

    for year in [None, Some(2015), Some(2016), Some(2018), Some(2019)] {
        let all = Slice::new(None, year);
        let imports = Slice::new(Some("Imports"), year);
        let exports = Slice::new(Some("Exports"), year);

        assert_eq!(
            agg.total_count(&all),
            agg.total_count(&imports) + agg.total_count(&exports)
        );
        assert_eq!(
            agg.total_value(&all),
            agg.total_value(&imports) + agg.total_value(&exports)
        );
    }
}

#[test]
fn test_top_n_is_sorted_subset() {
    let dataset = sample();
    let agg = Aggregator::new(Filter::new(&dataset));
    let candidates: Vec<Dimension> = agg.routes(None).into_iter().map(Dimension::Route).collect();
    let values = agg.value_sums(&candidates, &Slice::default()).unwrap();

    let top = top_n(&values, 3);
    assert_eq!(top.len(), 3.min(values.len()));
    assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    assert!(top.iter().all(|entry| values.contains(entry)));
    assert_eq!(top[0], ("USA-Mexico".to_string(), Decimal::from(9000)));

    let all = top_n(&values, 10);
    assert_eq!(all.len(), values.len());
}

#[test]
fn test_route_frequency_percentages_cover_the_slice() {
    let dataset = sample();
    let agg = Aggregator::new(Filter::new(&dataset));

    for direction in [None, Some("Imports"), Some("Exports")] {
        let slice = Slice::new(direction, None);
        let candidates: Vec<Dimension> = agg
            .routes(direction)
            .into_iter()
            .map(Dimension::Route)
            .collect();
        let frequencies = agg.frequencies(&candidates, &slice).unwrap();
        let pct = percentages(&frequencies, Decimal::from(agg.total_count(&slice)));

        let sum: Decimal = pct.iter().map(|(_, v)| *v).sum();
        assert!((sum - Decimal::ONE_HUNDRED).abs() <= Decimal::new(5, 2));
    }
}

#[test]
fn test_transport_mode_under_direction() {
    let dataset = sample();
    let agg = Aggregator::new(Filter::new(&dataset));
    let sea = Dimension::TransportMode("Sea".to_string());

    let slice = Slice::new(Some("Imports"), None);
    assert_eq!(agg.dimension_frequency(&sea, &slice).unwrap(), 3);
    assert_eq!(agg.dimension_value_sum(&sea, &slice).unwrap(), Decimal::from(1100));
}

#[test]
fn test_country_breakdown_and_merge() {
    let dataset = sample();
    let agg = Aggregator::new(Filter::new(&dataset));
    let breakdown = agg.country_breakdown("Imports", "Exports", None).unwrap();

    let value_of = |scores: &[(String, Decimal)], key: &str| {
        scores.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    };

    assert_eq!(value_of(&breakdown.imports, "Mexico"), Some(Decimal::from(9400)));
    assert_eq!(value_of(&breakdown.imports, "Japan"), Some(Decimal::from(700)));
    assert_eq!(value_of(&breakdown.exports, "Japan"), Some(Decimal::from(4000)));
    // Japan is both an import destination and an export origin.
    assert_eq!(value_of(&breakdown.total, "Japan"), Some(Decimal::from(4700)));
    // Germany only exports.
    assert_eq!(value_of(&breakdown.total, "Germany"), Some(Decimal::from(2500)));
    assert_eq!(breakdown.grand_total(), Decimal::from(21800));

    let imports_only = vec![("Chile".to_string(), Decimal::from(42))];
    let merged = merge_country_values(&imports_only, &[]);
    assert_eq!(value_of(&merged, "Chile"), Some(Decimal::from(42)));
}

#[test]
fn test_empty_year_percentages_are_zero() {
    let dataset = sample();
    let agg = Aggregator::new(Filter::with_current_year(&dataset, 2025));
    let slice = Slice::new(None, Some(2020));

    let total = agg.total_value(&slice);
    assert_eq!(total, Decimal::ZERO);
    assert_eq!(percentage(Decimal::from(10), total), Decimal::ZERO);
}
