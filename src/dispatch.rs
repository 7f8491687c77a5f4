use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time;

use crate::config::Config;
use crate::sender::Sender;
use crate::shutdown::Shutdown;
use crate::template::Template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    // issuing rounds
    Running,
    // no new rounds, waiting for in-flight sends
    Draining,
    // every issued send has completed
    Stopped,
}

/// Totals reported once the loop has stopped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub rounds: u64,
    pub sends: u64,
}

/// Replays every template once per round, with at most `threads` sends in
/// flight, until shutdown is triggered.
pub struct Dispatcher {
    templates: Vec<Arc<Template>>,
    sender: Sender,
    threads: u32,
    interval: Duration,
    budget: Arc<Semaphore>,
    summary: Summary,
}

impl Dispatcher {
    pub fn new(templates: Vec<Template>, sender: Sender, threads: u32, interval: Duration) -> Self {
        let threads = threads.max(1);
        Self {
            templates: templates.into_iter().map(Arc::new).collect(),
            sender,
            threads,
            interval,
            budget: Arc::new(Semaphore::new(threads as usize)),
            summary: Summary::default(),
        }
    }

    pub fn from_config(templates: Vec<Template>, sender: Sender, config: &Config) -> Self {
        Self::new(templates, sender, config.threads, config.interval())
    }

    /// Run until `shutdown` fires, then wait for every issued send to finish.
    pub async fn run(mut self, mut shutdown: Shutdown) -> Summary {
        let mut phase = Phase::Running;
        loop {
            phase = match phase {
                Phase::Running => self.next_round(&mut shutdown).await,
                Phase::Draining => {
                    self.drain().await;
                    Phase::Stopped
                }
                Phase::Stopped => break,
            };
        }

        self.summary
    }

    async fn next_round(&mut self, shutdown: &mut Shutdown) -> Phase {
        if shutdown.is_triggered() {
            return Phase::Draining;
        }

        self.summary.rounds += 1;
        tracing::debug!("starting round {}", self.summary.rounds);

        for template in &self.templates {
            let permit = Arc::clone(&self.budget)
                .acquire_owned()
                .await
                .expect("Semaphore closed unexpectedly");
            let sender = self.sender.clone();
            let template = Arc::clone(template);

            tokio::spawn(async move {
                sender.dispatch(&template).await;
                drop(permit);
            });
            self.summary.sends += 1;
        }

        tokio::select! {
            _ = time::sleep(self.interval) => {}
            _ = shutdown.wait() => {}
        }

        Phase::Running
    }

    // Every in-flight send holds one permit until it finishes, so owning
    // the whole budget means nothing is left running.
    async fn drain(&self) {
        tracing::debug!(
            "waiting for {} in-flight requests",
            self.threads as usize - self.budget.available_permits()
        );
        let _all = self
            .budget
            .acquire_many(self.threads)
            .await
            .expect("Semaphore closed unexpectedly");
    }
}
