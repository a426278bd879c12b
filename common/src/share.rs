//! 共有・クリップボード
//!
//! 共有シートが使えない環境ではURLをクリップボードにコピーする。

pub const APP_SHARE_TITLE: &str = "QR Scanner App";
pub const APP_SHARE_TEXT: &str = "Check out this QR Scanner App!";
pub const URL_COPIED_MESSAGE: &str = "App URL copied to clipboard!";

/// クリップボード
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn copy_text(&self, text: &str) -> Result<(), String>;
}

/// OSの共有シート
#[allow(async_fn_in_trait)]
pub trait ShareSheet {
    fn is_available(&self) -> bool;

    async fn share(&self, data: &ShareData) -> Result<(), String>;
}

/// 共有する内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareData {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareData {
    /// アプリ紹介用の共有データ
    pub fn app(url: impl Into<String>) -> Self {
        Self {
            title: APP_SHARE_TITLE.to_string(),
            text: APP_SHARE_TEXT.to_string(),
            url: url.into(),
        }
    }
}

/// 共有の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// 共有シートで共有した
    Shared,
    /// 共有シートがないためURLをコピーした
    CopiedUrl,
    /// 失敗（ログのみ）
    Failed(String),
}

impl ShareOutcome {
    /// トーストに出すメッセージ
    pub fn toast_message(&self) -> Option<&'static str> {
        match self {
            ShareOutcome::CopiedUrl => Some(URL_COPIED_MESSAGE),
            _ => None,
        }
    }
}

/// 共有を実行
pub async fn share_app<S, C>(sheet: &S, clipboard: &C, data: &ShareData) -> ShareOutcome
where
    S: ShareSheet,
    C: Clipboard,
{
    let result = if sheet.is_available() {
        sheet.share(data).await.map(|_| ShareOutcome::Shared)
    } else {
        clipboard
            .copy_text(&data.url)
            .await
            .map(|_| ShareOutcome::CopiedUrl)
    };

    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Error sharing");
            ShareOutcome::Failed(e)
        }
    }
}
