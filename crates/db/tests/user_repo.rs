use assert_matches::assert_matches;
use sqlx::PgPool;
use stockroom_core::pagination::PageRequest;
use stockroom_db::models::user::{CreateUser, UpdateUser};
use stockroom_db::repositories::UserRepo;

fn new_user(email: &str, first: &str, role: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        role: role.to_string(),
        first_name: Some(first.to_string()),
        last_name: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_violates_unique_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("a@example.com", "Ann", "user"))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("a@example.com", "Ann", "user"))
        .await
        .unwrap_err();

    assert_matches!(err, sqlx::Error::Database(_));
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_page_filters_by_role_and_search(pool: PgPool) {
    UserRepo::create(&pool, &new_user("ann@example.com", "Ann", "admin"))
        .await
        .unwrap();
    UserRepo::create(&pool, &new_user("bob@example.com", "Bob", "user"))
        .await
        .unwrap();
    UserRepo::create(&pool, &new_user("carl@sample.org", "Carl", "user"))
        .await
        .unwrap();

    let (users, total) = UserRepo::list_page(&pool, Some("user"), None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(users.iter().all(|u| u.role == "user"));

    let (users, total) =
        UserRepo::list_page(&pool, None, Some("EXAMPLE"), PageRequest::default())
            .await
            .unwrap();
    assert_eq!(total, 2);
    assert_eq!(users.len(), 2);

    let (_, total) = UserRepo::list_page(&pool, Some("admin"), Some("bob"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_password_change(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("ann@example.com", "Ann", "user"))
        .await
        .unwrap();

    let update = UpdateUser {
        last_name: Some("Smith".into()),
        ..UpdateUser::default()
    };
    let updated = UserRepo::update(&pool, user.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.first_name.as_deref(), Some("Ann"));
    assert_eq!(updated.last_name.as_deref(), Some("Smith"));

    assert!(UserRepo::update_password(&pool, user.id, "new-hash")
        .await
        .unwrap());
    let reloaded = UserRepo::find_by_email(&pool, "ann@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.password_hash, "new-hash");

    assert!(UserRepo::delete(&pool, user.id).await.unwrap());
    assert!(UserRepo::find_by_id(&pool, user.id).await.unwrap().is_none());
}
