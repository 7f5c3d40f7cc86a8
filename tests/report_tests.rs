use std::fs;
use tempfile::NamedTempFile;
use tradeflow::load_dataset;
use tradeflow::report::{self, AnalysisConfig};

fn write_dataset() -> NamedTempFile {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(
        &temp_file,
        "register_id,direction,origin,destination,year,date,product,transport_mode,company_name,total_value
1,Imports,A,B,2015,10/03/2015,Cars,Sea,Acme,100
2,Exports,A,B,2016,11/04/2016,Cars,Air,Acme,50
3,Imports,C,D,2015,12/05/2015,Oil,Sea,Globex,200",
    )
    .unwrap();
    temp_file
}

#[tokio::test]
async fn test_run_writes_every_table() {
    let input = write_dataset();
    let output = tempfile::tempdir().unwrap();
    let dataset = load_dataset(input.path().to_str().unwrap()).unwrap();
    let config = AnalysisConfig {
        years: vec![None, Some(2015), Some(2016)],
        ..AnalysisConfig::default()
    }
    .with_output_root(output.path());

    let (summary, stats) = report::run(&dataset, &config).await.unwrap();

    assert_eq!(summary.failed_cells, 0);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.written, summary.artifacts);

    let results = fs::read_to_string(output.path().join("option_1/All/All/results.csv")).unwrap();
    assert_eq!(
        results,
        "route,frequency,frequency_pct,total_value,total_value_pct\n\
         A-B,2,66.67,150,42.86\n\
         C-D,1,33.33,200,57.14\n"
    );

    let top = fs::read_to_string(output.path().join("option_1/Imports/2015/top10_frequency.csv"))
        .unwrap();
    assert_eq!(top, "route,frequency,frequency_pct\nA-B,1,50.00\nC-D,1,50.00\n");

    let summary_csv = fs::read_to_string(output.path().join("option_1/Exports/summary.csv")).unwrap();
    assert_eq!(
        summary_csv,
        "year,frequency_pct,total_value_pct\nAll,100.00,100.00\n2015,0.00,0.00\n2016,100.00,100.00\n"
    );

    let transport =
        fs::read_to_string(output.path().join("option_2/All/2016/results.csv")).unwrap();
    assert!(transport.starts_with("transport_mode,frequency,frequency_pct,total_value,total_value_pct\n"));
    assert!(transport.contains("Air,1,100.00,50,100.00\n"));

    let countries = fs::read_to_string(output.path().join("option_3/All/All/results.csv")).unwrap();
    assert_eq!(
        countries,
        "country,total_value,total_value_pct\nD,200,57.14\nB,100,28.57\nA,50,14.29\n"
    );
    assert!(output.path().join("option_3/Imports/2015/results.csv").exists());
    assert!(output.path().join("option_3/Exports/2016/results.csv").exists());
}
