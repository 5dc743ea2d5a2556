/// アプリケーション層
///
/// リポジトリごとの同期・SBOM生成と、それらを束ねるバッチ処理。
pub mod services;
pub mod use_cases;
