use phf::phf_map;

pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://ddragon.leagueoflegends.com/cdn/img/champion/loading";

const IMAGE_SUFFIX: &str = "_0.jpg";

/// Champions whose asset id differs from their display name.
pub static CHAMPION_ASSET_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "Wukong" => "MonkeyKing",
};

/// Asset id for a display name: alias table first, otherwise the name with
/// apostrophes and spaces removed ("K'Sante" -> "KSante", "Lee Sin" -> "LeeSin").
pub fn asset_id(champion: &str) -> String {
    if let Some(alias) = CHAMPION_ASSET_ALIASES.get(champion) {
        return (*alias).to_string();
    }
    champion
        .chars()
        .filter(|c| *c != '\'' && *c != ' ')
        .collect()
}

/// Loading-screen portrait URL. Not validated; an unknown champion simply 404s.
pub fn portrait_url(base_url: &str, champion: &str) -> String {
    format!(
        "{}/{}{IMAGE_SUFFIX}",
        base_url.trim_end_matches('/'),
        asset_id(champion)
    )
}
