use rocket::fairing::{Fairing, Info, Kind};
use rocket::tokio;
use rocket::{Orbit, Rocket};
use std::sync::Arc;

use crate::session::Sessions;

pub struct SessionSweeper;

#[rocket::async_trait]
impl Fairing for SessionSweeper {
    fn info(&self) -> Info {
        Info {
            name: "Session Sweeper",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let sessions = match rocket.state::<Arc<Sessions>>() {
            Some(s) => Arc::clone(s),
            None => {
                log::error!("[task] Session store not managed, sweeper not started");
                return;
            }
        };

        tokio::spawn(async move {
            let every = sessions.sweep_interval();
            loop {
                tokio::time::sleep(every).await;
                let count = sessions.sweep(sessions.idle_limit());
                if count > 0 {
                    log::info!("[task] Dropped {} idle page session(s), {} live", count, sessions.len());
                }
            }
        });
    }
}
