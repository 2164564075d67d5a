//! End-to-end flows through the hub: commands in, targeted pushes out.
//!
//! Drives `Hub::dispatch` directly with real outbound channels, covering
//! the moderation lifecycle and the partition-isolation guarantees.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crowdask_hub::{ClientCommand, Hub, ModeratorAuth, Role, ServerPush};
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::timeout;

    const SECRET: &str = "integration-secret";

    fn register(hub: &Hub, conn: crowdask_hub::ConnectionId, role: Role, session: &str) {
        hub.dispatch(
            conn,
            ClientCommand::RegisterScreen {
                screen: role,
                session_id: Some(session.to_string()),
                token: None,
            },
        );
    }

    async fn next_push(rx: &mut UnboundedReceiver<ServerPush>) -> ServerPush {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for push")
            .expect("push channel closed")
    }

    /// Waits for an `approved` push carrying a non-empty list.
    async fn wait_for_approved(
        rx: &mut UnboundedReceiver<ServerPush>,
    ) -> Vec<crowdask_core::Question> {
        loop {
            if let ServerPush::Approved(list) = next_push(rx).await {
                if !list.is_empty() {
                    return list;
                }
            }
        }
    }

    /// Waits for a `moderation` push with at least one pending question.
    async fn wait_for_pending(
        rx: &mut UnboundedReceiver<ServerPush>,
    ) -> Vec<crowdask_core::Question> {
        loop {
            if let ServerPush::Moderation { pending, .. } = next_push(rx).await {
                if !pending.is_empty() {
                    return pending;
                }
            }
        }
    }

    #[tokio::test]
    async fn moderation_lifecycle_reaches_the_display() {
        let hub = Hub::new(ModeratorAuth::new(SECRET));
        let session = hub.create_session("Demo");

        // Client X: attendee.
        let (x, _x_rx) = hub.connect();
        register(&hub, x, Role::Submit, &session.id);
        hub.dispatch(
            x,
            ClientCommand::SubmitQuestion {
                text: "Why?".into(),
                session_id: None,
            },
        );

        // Moderator M, authenticated.
        let (m, mut m_rx) = hub.connect();
        hub.dispatch(
            m,
            ClientCommand::RegisterScreen {
                screen: Role::Moderation,
                session_id: Some(session.id.clone()),
                token: Some(SECRET.into()),
            },
        );
        let pending = wait_for_pending(&mut m_rx).await;
        assert_eq!(pending.len(), 1);

        // Display D joins before approval.
        let (d, mut d_rx) = hub.connect();
        register(&hub, d, Role::Display, &session.id);

        hub.dispatch(
            m,
            ClientCommand::ApproveQuestion {
                id: pending[0].id.clone(),
                session_id: None,
            },
        );

        let approved = wait_for_approved(&mut d_rx).await;
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].text, "Why?");
        assert_eq!(approved[0].likes, 0);
    }

    #[tokio::test]
    async fn likes_accumulate_and_clamp_through_the_hub() {
        let hub = Hub::new(ModeratorAuth::new(SECRET));
        let session = hub.create_session("Demo");

        let (x, mut x_rx) = hub.connect();
        register(&hub, x, Role::Submit, &session.id);
        hub.dispatch(
            x,
            ClientCommand::SubmitQuestion {
                text: "Will there be pizza?".into(),
                session_id: None,
            },
        );

        let (m, mut m_rx) = hub.connect();
        hub.dispatch(
            m,
            ClientCommand::RegisterScreen {
                screen: Role::Moderation,
                session_id: Some(session.id.clone()),
                token: Some(SECRET.into()),
            },
        );
        let id = wait_for_pending(&mut m_rx).await[0].id.clone();
        hub.dispatch(
            m,
            ClientCommand::ApproveQuestion {
                id: id.clone(),
                session_id: None,
            },
        );

        for _ in 0..2 {
            hub.dispatch(
                x,
                ClientCommand::LikeQuestion {
                    id: id.clone(),
                    session_id: None,
                },
            );
        }
        hub.dispatch(
            x,
            ClientCommand::UnlikeQuestion {
                id: id.clone(),
                session_id: None,
            },
        );

        // Latest approved push reflects the clamped running total.
        let mut likes = None;
        while let Ok(push) = x_rx.try_recv() {
            if let ServerPush::Approved(list) = push {
                if let Some(q) = list.first() {
                    likes = Some(q.likes);
                }
            }
        }
        assert_eq!(likes, Some(1));
    }

    #[tokio::test]
    async fn pushes_stay_inside_their_session() {
        let hub = Hub::new(ModeratorAuth::new(SECRET));
        let a = hub.create_session("A");
        let b = hub.create_session("B");

        let (xa, mut xa_rx) = hub.connect();
        register(&hub, xa, Role::Submit, &a.id);
        let (db, mut db_rx) = hub.connect();
        register(&hub, db, Role::Display, &b.id);

        // Drain registration pushes.
        while xa_rx.try_recv().is_ok() {}
        while db_rx.try_recv().is_ok() {}

        hub.dispatch(
            xa,
            ClientCommand::SubmitQuestion {
                text: "A's question".into(),
                session_id: None,
            },
        );

        // A's submitter saw an update; B's display saw nothing.
        assert!(xa_rx.try_recv().is_ok());
        assert!(db_rx.try_recv().is_err());
    }
}
