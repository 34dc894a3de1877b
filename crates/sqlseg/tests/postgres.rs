use sqlseg::{Builder, FromRow, QueryBuilder, RowExt, SegResult, Segment, Table, create_pool};
use tokio_postgres::Row;

#[derive(Debug, PartialEq)]
struct Item {
    id: i64,
    name: String,
}

impl FromRow for Item {
    fn from_row(row: &Row) -> SegResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
        })
    }
}

fn database_url(test: &str) -> Option<String> {
    dotenvy::dotenv().ok();
    match std::env::var("DATABASE_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            None
        }
    }
}

/// Rows of a VALUES list, so the test needs no schema.
fn items() -> (Segment, Table) {
    let values = Segment::new(
        "SELECT * FROM (VALUES (1::bigint, 'one'), (2, 'two'), (3, 'three')) AS v(id, name)",
    );
    (values, Table::named("items"))
}

#[tokio::test]
async fn query_builder_against_postgres() -> SegResult<()> {
    let Some(url) = database_url("query_builder_against_postgres") else {
        return Ok(());
    };
    let pool = create_pool(&url, 2)?;
    let client = pool.get().await?;

    let (values, items) = items();
    let qb = QueryBuilder::new()
        .with("items", values)
        .select(items.columns(["id", "name"]))
        .from(items.clone())
        .in_list(items.column("id"), [1i64, 3])
        .order_by(items.column("id"), "ASC");

    let rows: Vec<Item> = qb.fetch_all_as(&client).await?;
    assert_eq!(
        rows,
        vec![
            Item {
                id: 1,
                name: "one".to_string()
            },
            Item {
                id: 3,
                name: "three".to_string()
            },
        ]
    );
    assert_eq!(qb.count(&client).await?, 2);
    Ok(())
}

#[tokio::test]
async fn built_segment_against_postgres() -> SegResult<()> {
    let Some(url) = database_url("built_segment_against_postgres") else {
        return Ok(());
    };
    let pool = create_pool(&url, 1)?;
    let client = pool.get().await?;

    let sum: i64 = Segment::new("SELECT $1::bigint + $2::bigint")
        .args([40i64, 2])
        .build()?
        .fetch_scalar_one(&client)
        .await?;
    assert_eq!(sum, 42);
    Ok(())
}
