//! Startup admin seeding.

use sqlx::PgPool;
use stockroom_api::auth::password::verify_password;
use stockroom_api::bootstrap::ensure_admin;
use stockroom_api::config::BootstrapAdmin;
use stockroom_db::repositories::UserRepo;

#[sqlx::test(migrations = "../../db/migrations")]
async fn seeds_admin_once(pool: PgPool) {
    let admin = BootstrapAdmin {
        email: "root@test.com".to_string(),
        password: "bootstrap-pass".to_string(),
    };

    assert!(ensure_admin(&pool, &admin).await.unwrap());
    assert!(!ensure_admin(&pool, &admin).await.unwrap());

    let user = UserRepo::find_by_email(&pool, "root@test.com")
        .await
        .unwrap()
        .expect("admin should exist");
    assert_eq!(user.role, "admin");
    assert!(verify_password("bootstrap-pass", &user.password_hash).unwrap());
}
