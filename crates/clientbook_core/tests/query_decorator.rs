use clientbook_core::db::open_db_in_memory;
use clientbook_core::{
    Client, ClientField, ClientQuery, ClientQueryDecorator, ClientRecord, ClientRepository,
    ClientShort, Filter, JsonClientRepository, LatestEventObserver, Order, QueryEvaluator,
    RepoError, RepoEvent, SqliteClientRepository,
};
use std::sync::Arc;

fn client(last_name: &str, phone: &str, city: &str, zip_code: i64, spending: f64) -> Client {
    Client::new(ClientRecord {
        id: None,
        last_name: last_name.to_string(),
        first_name: "Petr".to_string(),
        patronymic: String::new(),
        phone: phone.to_string(),
        email: format!("{}@example.ru", last_name.to_lowercase()),
        passport_series: "4511".to_string(),
        passport_number: "222333".to_string(),
        zip_code,
        city: city.to_string(),
        street: "Mira".to_string(),
        house: "3".to_string(),
        total_spending: spending,
    })
    .unwrap()
}

fn fixtures() -> Vec<Client> {
    vec![
        client("Orlov", "79000000001", "Moscow", 101_000, 500.0),
        client("Belov", "79000000002", "Kazan", 420_000, 150.0),
        client("Zaitsev", "79000000003", "Moscow", 101_000, 150.0),
        client("Egorov", "79000000004", "Omsk", 644_000, 900.0),
        client("Antonov", "79000000005", "Moscow", 102_000, 150.0),
    ]
}

fn seed(repo: &mut impl ClientRepository) {
    for mut fixture in fixtures() {
        repo.add(&mut fixture).unwrap();
    }
}

fn names(page: &[ClientShort]) -> Vec<String> {
    page.iter()
        .map(|short| short.short_name().to_string())
        .collect()
}

#[test]
fn filter_and_order_apply_before_pagination() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonClientRepository::open(dir.path().join("clients.json"));
    repo.add(&mut client("Ivanov", "79000000001", "Moscow", 101_000, 300.0))
        .unwrap();
    repo.add(&mut client("Petrov", "79000000002", "Moscow", 101_000, 100.0))
        .unwrap();
    repo.add(&mut client("Sidorov", "79000000003", "Kazan", 420_000, 200.0))
        .unwrap();

    let mut decorator = ClientQueryDecorator::new(&mut repo);
    decorator
        .set_filter(Filter::eq(ClientField::City, "Moscow").unwrap())
        .set_order(Order::asc(ClientField::TotalSpending));

    assert_eq!(
        names(&decorator.page(1, 10).unwrap()),
        vec!["Petrov P.", "Ivanov P."]
    );
    assert_eq!(decorator.count().unwrap(), 2);
    assert_eq!(names(&decorator.page(2, 1).unwrap()), vec!["Ivanov P."]);
    assert!(decorator.page(10, 1).unwrap().is_empty());
}

#[test]
fn clearing_criteria_restores_plain_behavior() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonClientRepository::open(dir.path().join("clients.json"));
    seed(&mut repo);
    let plain = repo.page(1, 10).unwrap();

    let mut decorator = ClientQueryDecorator::new(&mut repo);
    decorator
        .set_filter(Filter::eq(ClientField::City, "Omsk").unwrap())
        .set_order(Order::desc(ClientField::LastName));
    assert_eq!(decorator.count().unwrap(), 1);

    decorator.clear_filter();
    assert_eq!(decorator.count().unwrap(), 5);
    assert_eq!(
        names(&decorator.page(1, 2).unwrap()),
        vec!["Zaitsev P.", "Orlov P."]
    );

    decorator.clear_order();
    assert_eq!(decorator.query(), &ClientQuery::new());
    assert_eq!(decorator.page(1, 10).unwrap(), plain);
}

#[test]
fn setting_a_filter_replaces_the_previous_one() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = JsonClientRepository::open(dir.path().join("clients.json"));
    seed(&mut repo);

    let mut decorator = ClientQueryDecorator::new(&mut repo);
    decorator.set_filter(Filter::eq(ClientField::City, "Moscow").unwrap());
    decorator.set_filter(Filter::eq(ClientField::ZipCode, 420_000).unwrap());

    assert_eq!(names(&decorator.page(1, 10).unwrap()), vec!["Belov P."]);
}

#[test]
fn filter_value_must_match_field_kind() {
    assert!(matches!(
        Filter::eq(ClientField::ZipCode, "Moscow").unwrap_err(),
        RepoError::InvalidArgument(_)
    ));
    assert!(Filter::eq(ClientField::TotalSpending, 150).is_ok());
    assert!(matches!(
        Order::parse("nickname", "asc").unwrap_err(),
        RepoError::InvalidArgument(_)
    ));
}

#[test]
fn filter_with_no_matches_yields_empty_pages() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&conn).unwrap();
    seed(&mut repo);

    let mut decorator = ClientQueryDecorator::new(&mut repo);
    decorator.set_filter(Filter::eq(ClientField::City, "Tver").unwrap());

    assert_eq!(decorator.count().unwrap(), 0);
    assert!(decorator.page(1, 5).unwrap().is_empty());
}

#[test]
fn file_and_database_evaluators_agree() {
    let dir = tempfile::tempdir().unwrap();
    let mut file_repo = JsonClientRepository::open(dir.path().join("clients.json"));
    seed(&mut file_repo);
    let conn = open_db_in_memory().unwrap();
    let mut db_repo = SqliteClientRepository::try_new(&conn).unwrap();
    seed(&mut db_repo);
    for repo in [&mut file_repo as &mut dyn ClientRepository, &mut db_repo] {
        repo.add(&mut client("Gromov", "79000000006", "Tula", 300_000, 0.0))
            .unwrap();
        repo.add(&mut client("Fomin", "79000000007", "Tula", 300_000, -0.0))
            .unwrap();
    }

    let moscow = Filter::eq(ClientField::City, "Moscow").unwrap();
    let queries = [
        ClientQuery::new(),
        ClientQuery::new().with_filter(moscow.clone()),
        ClientQuery::new().with_order(Order::asc(ClientField::TotalSpending)),
        ClientQuery::new().with_order(Order::desc(ClientField::TotalSpending)),
        ClientQuery::new()
            .with_filter(moscow.clone())
            .with_order(Order::desc(ClientField::TotalSpending)),
        ClientQuery::new()
            .with_filter(Filter::eq(ClientField::TotalSpending, 150.0).unwrap())
            .with_order(Order::asc(ClientField::ZipCode)),
        ClientQuery::new().with_order(Order::desc(ClientField::Id)),
        ClientQuery::new().with_order(Order::asc(ClientField::LastName)),
        ClientQuery::new()
            .with_filter(Filter::eq(ClientField::TotalSpending, 0.0).unwrap())
            .with_order(Order::desc(ClientField::TotalSpending)),
    ];

    let file_view = ClientQueryDecorator::new(&mut file_repo);
    let file_pages = queries
        .iter()
        .map(|query| {
            (
                file_view.page_with(query, 1, 3).unwrap(),
                file_view.page_with(query, 2, 3).unwrap(),
                file_view.page_with(query, 3, 3).unwrap(),
                file_view.count_with(query).unwrap(),
            )
        })
        .collect::<Vec<_>>();

    let db_view = ClientQueryDecorator::new(&mut db_repo);
    for (query, expected) in queries.iter().zip(file_pages) {
        let actual = (
            db_view.page_with(query, 1, 3).unwrap(),
            db_view.page_with(query, 2, 3).unwrap(),
            db_view.page_with(query, 3, 3).unwrap(),
            db_view.count_with(query).unwrap(),
        );
        assert_eq!(actual, expected, "query diverged: {query:?}");
    }
}

#[test]
fn ties_keep_ascending_id_in_both_directions() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&conn).unwrap();
    seed(&mut repo);

    let query = ClientQuery::new().with_order(Order::desc(ClientField::TotalSpending));
    let clients = repo
        .evaluate_page(&query, clientbook_core::PageWindow::new(1, 10).unwrap())
        .unwrap();
    let ids = clients.iter().filter_map(Client::id).collect::<Vec<_>>();

    assert_eq!(ids, vec![4, 1, 2, 3, 5]);
}

#[test]
fn decorator_delegates_mutations_and_notifications() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clients.json");
    let mut repo = JsonClientRepository::open(&path);
    let latest = Arc::new(LatestEventObserver::new());

    {
        let mut decorator = ClientQueryDecorator::new(&mut repo);
        decorator.subscribe(latest.clone());
        decorator.set_filter(Filter::eq(ClientField::City, "Moscow").unwrap());

        let id = decorator
            .add(&mut client("Orlov", "79000000001", "Moscow", 101_000, 5.0))
            .unwrap();
        decorator
            .add(&mut client("Belov", "79000000002", "Kazan", 420_000, 5.0))
            .unwrap();
        assert_eq!(decorator.count().unwrap(), 1);
        assert!(decorator.get_by_id(2).unwrap().is_some());

        decorator.sort_by_field("last_name").unwrap();
        assert_eq!(latest.latest(), Some(RepoEvent::Reordered(ClientField::LastName)));

        decorator.delete_by_id(id).unwrap();
        assert_eq!(latest.latest(), Some(RepoEvent::Deleted(id)));
        assert_eq!(decorator.count().unwrap(), 0);
    }

    assert_eq!(repo.count().unwrap(), 1);
    assert_eq!(JsonClientRepository::open(&path).count().unwrap(), 1);
}

#[test]
fn decorator_over_database_keeps_unsupported_reorder() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqliteClientRepository::try_new(&conn).unwrap();
    let mut decorator = ClientQueryDecorator::new(&mut repo);

    assert!(matches!(
        decorator.sort_by_field("city").unwrap_err(),
        RepoError::Unsupported(_)
    ));
}
