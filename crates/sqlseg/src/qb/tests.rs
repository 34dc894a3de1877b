use super::*;
use crate::value::Value;

fn users() -> Table {
    Table::new("users", "u")
}

fn orders() -> Table {
    Table::new("orders", "o")
}

fn on(left: TableColumn, right: TableColumn) -> Segment {
    Segment::new("#c1=#c2").columns([left, right])
}

fn values<const N: usize>(items: [Value; N]) -> Vec<Value> {
    items.to_vec()
}

#[test]
fn select_distinct_with_condition() {
    let foo = Table::new("foo", "f");
    let built = QueryBuilder::new()
        .distinct()
        .select([foo.column("*")])
        .from(foo.clone())
        .gt(foo.column("id"), 1)
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT DISTINCT f.* FROM foo AS f WHERE f.id>$1");
    assert_eq!(built.args, values([1.into()]));
}

#[test]
fn union_continues_argument_numbering() {
    let foo = Table::new("foo", "f");
    let first = QueryBuilder::new()
        .select([foo.column("*")])
        .from(foo.clone())
        .eq(foo.column("id"), 1);
    let second = QueryBuilder::new()
        .select([foo.column("*")])
        .from(foo.clone())
        .in_list(foo.column("id"), [2, 3, 4]);

    let built = first.union(second).build().unwrap();
    assert_eq!(
        built.sql,
        "SELECT f.* FROM foo AS f WHERE f.id=$1 \
         UNION (SELECT f.* FROM foo AS f WHERE f.id IN ($2, $3, $4))"
    );
    assert_eq!(
        built.args,
        values([1.into(), 2.into(), 3.into(), 4.into()])
    );
}

fn foo_bar_query() -> QueryBuilder {
    let foo = Table::new("foo", "f");
    let bar = Table::new("bar", "b");
    QueryBuilder::new()
        .select([foo.column("*")])
        .from(foo.clone())
        .inner_join(bar.clone(), on(bar.column("foo_id"), foo.column("id")))
        .and_where(
            Segment::new("(#c1=$1 OR #c2=$1)")
                .columns([foo.column("a"), foo.column("b")])
                .arg(1),
        )
        .eq(bar.column("c"), 2)
}

#[test]
fn join_with_conditions_indexed() {
    let built = foo_bar_query().build().unwrap();
    assert_eq!(
        built.sql,
        "SELECT f.* FROM foo AS f INNER JOIN bar AS b ON b.foo_id=f.id \
         WHERE (f.a=$1 OR f.b=$1) AND b.c=$2"
    );
    assert_eq!(built.args, values([1.into(), 2.into()]));
    assert_eq!(built.style, BindVarStyle::Indexed);
}

#[test]
fn join_with_conditions_positional() {
    let built = foo_bar_query()
        .bind_var(BindVarStyle::Positional)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT f.* FROM foo AS f INNER JOIN bar AS b ON b.foo_id=f.id \
         WHERE (f.a=? OR f.b=?) AND b.c=?"
    );
    assert_eq!(built.args, values([1.into(), 1.into(), 2.into()]));
}

fn users_with_optional_orders() -> QueryBuilder {
    let (u, o) = (users(), orders());
    QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .left_join_optional(o.clone(), on(o.column("user_id"), u.column("id")))
}

#[test]
fn unreferenced_optional_join_is_eliminated_under_distinct() {
    let built = users_with_optional_orders().distinct().build().unwrap();
    assert_eq!(built.sql, "SELECT DISTINCT u.id FROM users AS u");
}

#[test]
fn optional_join_reappears_when_referenced() {
    let built = users_with_optional_orders()
        .distinct()
        .eq(orders().column("status"), "paid")
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT DISTINCT u.id FROM users AS u LEFT JOIN orders AS o ON o.user_id=u.id \
         WHERE o.status=$1"
    );
    assert_eq!(built.args, values(["paid".into()]));
}

#[test]
fn optional_join_is_kept_without_distinct() {
    let built = users_with_optional_orders().build().unwrap();
    assert_eq!(
        built.sql,
        "SELECT u.id FROM users AS u LEFT JOIN orders AS o ON o.user_id=u.id"
    );
}

#[test]
fn optional_join_kept_for_mandatory_dependant() {
    let o = orders();
    let items = Table::new("items", "i");
    let built = users_with_optional_orders()
        .distinct()
        .inner_join(items.clone(), on(items.column("order_id"), o.column("id")))
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT DISTINCT u.id FROM users AS u LEFT JOIN orders AS o ON o.user_id=u.id \
         INNER JOIN items AS i ON i.order_id=o.id"
    );
}

#[test]
fn order_by_touches_the_select_list() {
    let u = users();
    let built = QueryBuilder::new()
        .distinct()
        .select([u.column("id")])
        .from(u.clone())
        .order_by(u.column("name"), "DESC")
        .order_by(u.column("id"), "ASC")
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT DISTINCT u.id, u.name AS _order_1, u.id AS _order_2 FROM users AS u \
         ORDER BY _order_1 DESC, _order_2 ASC"
    );
}

#[test]
fn group_by_limit_and_offset() {
    let u = users();
    let mut columns = vec![u.column("dept")];
    columns.extend(u.expressions(["COUNT(1)"]));
    let built = QueryBuilder::new()
        .select(columns)
        .from(u.clone())
        .group_by(u.column("dept"))
        .limit(10)
        .offset(20)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT u.dept, COUNT(1) FROM users AS u GROUP BY u.dept LIMIT 10 OFFSET 20"
    );
}

#[test]
fn zero_limit_and_offset_are_omitted() {
    let u = users();
    let built = QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .limit(0)
        .offset(0)
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT u.id FROM users AS u");
}

#[test]
fn cross_join_has_no_on_clause() {
    let (u, o) = (users(), orders());
    let built = QueryBuilder::new()
        .select([u.column("id"), o.column("id")])
        .from(u.clone())
        .cross_join(o.clone())
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT u.id, o.id FROM users AS u CROSS JOIN orders AS o"
    );
}

fn with_recent_orders() -> (QueryBuilder, Table) {
    let (u, o) = (users(), orders());
    let recent = Table::named("recent");
    let inner = QueryBuilder::new()
        .select([o.column("user_id")])
        .from(o.clone())
        .gt(o.column("total"), 100);
    let qb = QueryBuilder::new()
        .with("recent", inner)
        .select([u.column("name")])
        .from(u.clone());
    (qb, recent)
}

#[test]
fn cte_is_rendered_for_joined_table() {
    let (qb, recent) = with_recent_orders();
    let u = users();
    let built = qb
        .inner_join(recent.clone(), on(recent.column("user_id"), u.column("id")))
        .eq(u.column("active"), true)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "WITH recent AS (SELECT o.user_id FROM orders AS o WHERE o.total>$1) \
         SELECT u.name FROM users AS u INNER JOIN recent ON recent.user_id=u.id \
         WHERE u.active=$2"
    );
    assert_eq!(built.args, values([100.into(), true.into()]));
}

#[test]
fn cte_is_dropped_with_its_eliminated_join() {
    let (qb, recent) = with_recent_orders();
    let built = qb
        .distinct()
        .left_join_optional(recent.clone(), on(recent.column("user_id"), users().column("id")))
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT DISTINCT u.name FROM users AS u");
    assert!(built.args.is_empty());
}

#[test]
fn declaration_errors_are_collected() {
    let u = users();
    let err = QueryBuilder::new()
        .select([u.column("id")])
        .from(Table::named(""))
        .from(u.clone())
        .left_join(u.clone(), Segment::new("TRUE"))
        .with("", Segment::new("SELECT 1"))
        .build()
        .unwrap_err();
    assert!(err.is_composition());
    assert_eq!(
        err.to_string(),
        "collected errors:  * from table name is empty; * table [users AS u] is already joined; * with name is empty;"
    );
}

#[test]
fn missing_from_and_projection() {
    let u = users();
    let err = QueryBuilder::new()
        .select([u.column("id")])
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "collected errors:  * no FROM table;");

    let err = QueryBuilder::new().from(u.clone()).build().unwrap_err();
    assert_eq!(err.to_string(), "collected errors:  * no columns selected;");
}

#[test]
fn column_of_unknown_table() {
    let err = QueryBuilder::new()
        .select([users().column("id")])
        .from(orders())
        .build()
        .unwrap_err();
    assert!(err.is_composition());
    assert!(err.to_string().contains("table 'u' not found in FROM"), "{err}");
}

#[test]
fn empty_in_list_matches_nothing() {
    let u = users();
    let built = QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .in_list(u.column("id"), Vec::<i64>::new())
        .not_in(u.column("role"), Vec::<String>::new())
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT u.id FROM users AS u WHERE FALSE AND TRUE");
    assert!(built.args.is_empty());
}

#[test]
fn null_checks_and_comparisons() {
    let u = users();
    let built = QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .is_null(u.column("deleted_at"))
        .ne(u.column("role"), "guest")
        .lte(u.column("age"), 65)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT u.id FROM users AS u WHERE u.deleted_at IS NULL AND u.role<>$1 AND u.age<=$2"
    );
}

#[test]
fn count_and_select_override() {
    let u = users();
    let qb = QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .eq(u.column("active"), true);

    let count = qb.count_query(Vec::new()).unwrap();
    assert_eq!(
        count.sql,
        "SELECT COUNT(1) FROM (SELECT u.id FROM users AS u WHERE u.active=$1) list"
    );
    assert_eq!(count.args, values([true.into()]));

    let names = qb.build_select(vec![u.column("name")]).unwrap();
    assert_eq!(names.sql, "SELECT u.name FROM users AS u WHERE u.active=$1");
}

#[test]
fn custom_functions_are_available_to_clauses() {
    let mut funcs = FuncMap::new();
    funcs
        .register("lower", |ctx, args| {
            let index = args.first().and_then(|a| a.parse().ok()).unwrap_or(1);
            Ok(format!("LOWER({})", ctx.column(index)?))
        })
        .unwrap();
    let u = users();
    let built = QueryBuilder::new()
        .funcs(Arc::new(funcs))
        .select([u.column("id")])
        .from(u.clone())
        .and_where(Segment::new("#lower(1)=$1").column(u.column("email")).arg("a@b.c"))
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT u.id FROM users AS u WHERE LOWER(u.email)=$1"
    );
}

#[test]
fn nested_build_errors_keep_their_template() {
    let u = users();
    let err = QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .and_where(Segment::new("1=1").arg(1))
        .build()
        .unwrap_err();
    assert!(err.is_unused_declaration(), "{err}");
    assert!(err.to_string().contains("build '1=1'"), "{err}");
}

#[test]
fn mixed_styles_across_clauses() {
    let u = users();
    let err = QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .and_where(Segment::new("#c1=$1").column(u.column("a")).arg(1))
        .and_where(Segment::new("#c1=?").column(u.column("b")).arg(2))
        .build()
        .unwrap_err();
    assert!(err.is_mixed_bind_var_style(), "{err}");
}

#[test]
fn empty_on_clause_drops_its_declarations() {
    let (u, o) = (users(), orders());
    let built = QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .left_join(o.clone(), Segment::default().column(o.column("user_id")))
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT u.id FROM users AS u LEFT JOIN orders AS o"
    );
    assert!(built.args.is_empty());
}

#[test]
fn from_an_already_joined_table_keeps_the_anchor() {
    let (u, o) = (users(), orders());
    let qb = QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .left_join(o.clone(), on(o.column("user_id"), u.column("id")))
        .from(o.clone());
    assert_eq!(qb.anchor.as_deref(), Some("u"));
    assert!(qb.froms.contains_key("u"));
    assert!(qb.froms.contains_key("o"));
    assert_eq!(qb.errors, vec!["table [orders AS o] is already joined".to_string()]);

    let qb = QueryBuilder::new()
        .select([u.column("id")])
        .from(u.clone())
        .from(u.clone());
    assert!(qb.errors.is_empty());
    assert_eq!(qb.anchor.as_deref(), Some("u"));
    assert_eq!(qb.build().unwrap().sql, "SELECT u.id FROM users AS u");
}
