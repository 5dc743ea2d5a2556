/// ドメイン層
///
/// 設定ファイルの内容、URLとリポジトリ名、1リポジトリ分の処理単位を表す型。
pub mod entities;
pub mod value_objects;
