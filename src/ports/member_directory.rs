use crate::domain::value_objects::MemberId;
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員情報
///
/// 通知の宛先として必要な最小限の情報。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
}

/// 会員ディレクトリポート
///
/// 貸出コンテキストと会員コンテキストの境界を維持する。
/// 貸出コンテキストはMemberIDのみを知り、会員詳細は知らない。
#[allow(dead_code)]
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// 会員IDから会員情報を解決する
    ///
    /// 退会等で存在しない場合は`Ok(None)`を返す。
    /// Dispatcherは解決できない会員をスキップし、バッチを継続する。
    async fn resolve(&self, member_id: MemberId) -> Result<Option<MemberInfo>>;
}
