use bench_bindings::config::cli::Command;
use bench_bindings::utils::{logger, validation::Validate};
use bench_bindings::{connect, report, CliConfig, FieldSet, Fields, Operation, Status};
use clap::Parser;

fn field_filter(fields: Vec<String>) -> Option<FieldSet> {
    if fields.is_empty() {
        None
    } else {
        Some(fields.into_iter().collect())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = cli.binding_config()?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let mut db = connect(&config).await?;
    let table = cli.table.as_str();

    let (operation, result) = match cli.command {
        Command::Read { key, fields } => {
            let fields = field_filter(fields);
            let result = db.read(table, &key, fields.as_ref()).await;
            (Operation::Read, result.map(|record| serde_json::json!(record)))
        }
        Command::Insert { key, values } => {
            let values: Fields = values.into_iter().collect();
            let result = db.insert(table, &key, &values).await;
            (Operation::Insert, result.map(|_| serde_json::Value::Null))
        }
        Command::Update { key, values } => {
            let values: Fields = values.into_iter().collect();
            let result = db.update(table, &key, &values).await;
            (Operation::Update, result.map(|_| serde_json::Value::Null))
        }
        Command::Delete { key } => {
            let result = db.delete(table, &key).await;
            (Operation::Delete, result.map(|_| serde_json::Value::Null))
        }
        Command::Scan {
            start_key,
            count,
            fields,
        } => {
            let fields = field_filter(fields);
            let result = db.scan(table, &start_key, count, fields.as_ref()).await;
            (Operation::Scan, result.map(|records| serde_json::json!(records)))
        }
    };

    let status = report(operation, &result);
    if let Ok(output) = &result {
        if !output.is_null() {
            println!("{}", serde_json::to_string_pretty(output)?);
        }
    }
    eprintln!("{} {}", operation, status);

    if let Err(e) = db.cleanup().await {
        tracing::warn!("Cleanup failed: {}", e);
    }

    if status == Status::Error {
        std::process::exit(1);
    }
    Ok(())
}
