use std::sync::Arc;

use dotenv::dotenv;
use mindtrack_social::{repositories::user_repository::PgUserRepository, settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let settings = settings::load_settings()?;
    mindtrack_social::init_tracing(&settings);

    let database_url = settings
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set to seed"))?;
    let db = mindtrack_social::setup_database(database_url).await?;
    let state = mindtrack_social::setup_services(Arc::new(PgUserRepository::new(db)), &settings);

    seed::seed_data(&state, 10, 15).await?;

    Ok(())
}

mod seed {
    use fake::faker::internet::en::{SafeEmail, Username};
    use fake::faker::name::en::{FirstName, LastName};
    use fake::{Fake, Faker};
    use mindtrack_social::{
        models::users::{NewUser, User},
        utils::errors::follow_error::FollowError,
        AppState,
    };
    use tracing::info;

    pub async fn seed_data(state: &AppState, users: usize, follows: usize) -> anyhow::Result<()> {
        let users = seed_users(state, users).await?;
        seed_user_follows(state, &users, follows).await?;

        for user in &users {
            let token = state.auth_service.issue(user)?;
            println!("{}\t{}\tBearer {}", user.id, user.login, token);
        }
        info!("Seed data inserted successfully");
        Ok(())
    }

    async fn seed_users(state: &AppState, count: usize) -> anyhow::Result<Vec<User>> {
        let mut users = Vec::with_capacity(count);

        for i in 0..count {
            let username: String = Username().fake();
            let user = state
                .follow_service
                .register(NewUser {
                    first_name: FirstName().fake(),
                    last_name: LastName().fake(),
                    login: format!("{}{}", username, i),
                    email: format!("{}.{}", i, SafeEmail().fake::<String>()),
                    username: Some(username),
                    avatar_url: None,
                })
                .await?;
            users.push(user);
        }

        Ok(users)
    }

    async fn seed_user_follows(
        state: &AppState,
        users: &[User],
        count: usize,
    ) -> anyhow::Result<()> {
        if users.len() < 2 {
            return Ok(());
        }

        for _ in 0..count {
            let follower = &users[Faker.fake::<usize>() % users.len()];
            let mut followed = &users[Faker.fake::<usize>() % users.len()];

            while follower.id == followed.id {
                followed = &users[Faker.fake::<usize>() % users.len()];
            }

            match state.follow_service.follow(follower.id, followed.id).await {
                Ok(()) | Err(FollowError::AlreadyFollowing(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }
}
