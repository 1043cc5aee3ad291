use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

pub const VERIFICATION_SUBJECT: &str = "ハルスマイル | 本登録のご案内";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl OutgoingMail {
    /// Registration mail carrying the account verification link.
    pub fn verification(
        from: &str,
        to: &str,
        frontend_url: &str,
        token: &str,
        valid_minutes: i64,
    ) -> Self {
        let link = verification_link(frontend_url, token, valid_minutes);
        let html_body = format!(
            "<h1>ハルスマイルへのご登録ありがとうございます</h1>\n\
             <p><a href=\"{}\">こちらのリンク</a>をクリックして本登録をしてください。</p>\n\
             <p>リンクの有効期限は{}分です。</p>",
            link, valid_minutes
        );

        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: VERIFICATION_SUBJECT.to_string(),
            text_body: "本登録のご案内です。".to_string(),
            html_body,
        }
    }
}

pub fn verification_link(frontend_url: &str, token: &str, valid_minutes: i64) -> String {
    format!(
        "{}/auth/verify?token={}&exp={}",
        frontend_url.trim_end_matches('/'),
        token,
        valid_minutes
    )
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Writes mail to the log instead of delivering it.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            "Outgoing mail:\n{}",
            mail.html_body
        );
        Ok(())
    }
}

/// Keeps every sent message in memory.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        self.sent.lock().await.push(mail.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_mail_links_to_frontend() {
        let mail = OutgoingMail::verification(
            "harusmile@email.com",
            "hanako@example.com",
            "http://localhost:3000/",
            "tok",
            30,
        );

        assert_eq!(mail.subject, VERIFICATION_SUBJECT);
        assert_eq!(mail.to, "hanako@example.com");
        assert!(mail
            .html_body
            .contains("http://localhost:3000/auth/verify?token=tok&exp=30"));
    }

    #[test]
    fn memory_mailer_records_messages() {
        let mailer = MemoryMailer::new();
        let mail = OutgoingMail::verification("a@b.jp", "c@d.jp", "http://x", "t", 30);

        tokio_test::block_on(async {
            mailer.send(&mail).await.unwrap();
            assert_eq!(mailer.sent().await, vec![mail.clone()]);
        });
    }
}
