use std::fs;
use std::time::UNIX_EPOCH;

fn main() {
    // data/seed.json の更新日時を取得
    if let Ok(metadata) = fs::metadata("data/seed.json") {
        if let Ok(modified) = metadata.modified() {
            if let Ok(duration) = modified.duration_since(UNIX_EPOCH) {
                let timestamp = duration.as_secs();
                println!("cargo:rustc-env=SEED_DATA_MODIFIED={}", timestamp);
            }
        }
    } else {
        println!("cargo:warning=Could not read data/seed.json");
    }

    // 初期データ・管理設定の変更時に再ビルド
    println!("cargo:rerun-if-changed=data/seed.json");
    println!("cargo:rerun-if-env-changed=CLUB_STORAGE_KEY");
    println!("cargo:rerun-if-env-changed=CLUB_ADMIN_ENTRY_TOKEN");
    println!("cargo:rerun-if-env-changed=CLUB_ADMIN_PASSWORD");
}
