//! Free trial / premium subscription state.
//!
//! A fresh installation starts a trial that lasts `trial_days`. Once the trial
//! end passes without a plan, every gated feature locks until `subscribe`.

use anyhow::Result;
use chrono::{Duration, Utc};
use log::{info, warn};
use std::sync::Arc;

use shared::{Subscription, SubscriptionPlan, SubscriptionStatus};

use crate::clock::Clock;
use crate::domain::commands::subscription::SubscribeCommand;
use crate::storage::{keys, DocumentLoad, DocumentStore, KeyValueStorage};

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Clone)]
pub struct SubscriptionService {
    store: DocumentStore<Subscription>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionService {
    /// Load the stored subscription, starting a trial on first run
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>, trial_days: i64) -> Result<Self> {
        let (store, load) = DocumentStore::open(storage, keys::SUBSCRIPTION);
        let service = Self { store, clock };

        match load {
            DocumentLoad::Loaded => {}
            DocumentLoad::Missing => {
                let ends_at = service.clock.now().with_timezone(&Utc) + Duration::days(trial_days);
                service.store.save(Subscription::trial(ends_at))?;
                info!("Started a {} day trial ending {}", trial_days, ends_at);
            }
            DocumentLoad::Corrupt => {
                warn!("Stored subscription is unreadable, treating the trial as expired");
                service.store.save(Subscription::expired())?;
            }
        }

        Ok(service)
    }

    /// Stored state as is, without checking the trial end
    pub fn current(&self) -> Subscription {
        self.store.get().unwrap_or_else(Subscription::expired)
    }

    /// Expire a finished trial (persisting the change) and report the state
    pub fn evaluate(&self) -> Result<SubscriptionStatus> {
        let mut subscription = self.current();
        let now = self.clock.now().with_timezone(&Utc);

        if !subscription.is_premium && subscription.is_active {
            if let Some(ends_at) = subscription.trial_ends_at {
                if ends_at < now {
                    subscription.is_active = false;
                    self.store.save(subscription.clone())?;
                    info!("Trial ended at {}", ends_at);
                }
            }
        }

        Ok(SubscriptionStatus {
            state: subscription.state(),
            days_left_in_trial: self.days_left(&subscription),
            prompt_required: subscription.is_locked(),
            subscription,
        })
    }

    pub fn is_locked(&self) -> Result<bool> {
        Ok(self.evaluate()?.prompt_required)
    }

    /// Upgrade to a paid plan from any state
    pub fn subscribe(&self, command: SubscribeCommand) -> Result<Subscription> {
        let subscription = Subscription::premium(command.plan);
        self.store.save(subscription.clone())?;
        info!("Subscribed to the {} plan", command.plan);
        Ok(subscription)
    }

    pub fn subscribe_to(&self, plan: SubscriptionPlan) -> Result<Subscription> {
        self.subscribe(SubscribeCommand { plan })
    }

    /// Whole days left in the trial, rounded up; 0 when there is no trial
    pub fn days_left_in_trial(&self) -> i64 {
        self.days_left(&self.current())
    }

    fn days_left(&self, subscription: &Subscription) -> i64 {
        if subscription.is_premium {
            return 0;
        }
        let Some(ends_at) = subscription.trial_ends_at else {
            return 0;
        };
        let seconds = (ends_at - self.clock.now().with_timezone(&Utc)).num_seconds();
        if seconds <= 0 {
            0
        } else {
            (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
        }
    }
}
