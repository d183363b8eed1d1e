use rand::{
    seq::{IndexedRandom, SliceRandom},
    Rng,
};

/// One line in the chat pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    Text { user: String, text: String },
    Emote { user: String, emote_url: String },
}

pub const MIN_EMOTES: usize = 5;
pub const MAX_EMOTES: usize = 12;
pub const MAX_EMOTE_INDEX: u32 = 12;

// Curated pool; the names are not meant to match any upstream list.
pub const VIEWER_NAMES: [&str; 40] = [
    "밤하늘산책", "별빛수집가", "야화바라기", "새벽감성", "달빛아래서",
    "오늘도출석", "치킨은반반", "고양이집사", "라면한그릇", "퇴근길시청",
    "몰래보는중", "구독자1호", "방송켜면달려감", "채팅창지킴이", "잠못드는밤",
    "커피는아아", "월요병환자", "랜선친구", "조용히응원중", "리액션장인",
    "눈팅전문가", "야식메이트", "새벽세시", "감자튀김", "딸기우유",
    "꿀잠예약", "알림설정완료", "야화님최고", "밤샘각", "편의점털이",
    "소파위의감자", "이불밖은위험해", "출근하기싫다", "집에가고싶다", "오늘의운세",
    "비오는날", "눈오는밤", "떡볶이러버", "하품중", "마지막한판",
];

/// Keeps a user chat only if both the name and the message are non-empty.
pub fn text_entry(user: Option<String>, text: Option<String>) -> Option<ChatEntry> {
    match (user, text) {
        (Some(user), Some(text)) if !user.is_empty() && !text.is_empty() => {
            Some(ChatEntry::Text { user, text })
        }
        _ => None,
    }
}

pub fn emote_url(image_base_url: &str, index: u32) -> String {
    format!("{image_base_url}YA{index}.png")
}

pub fn random_emotes<R: Rng + ?Sized>(rng: &mut R, image_base_url: &str) -> Vec<ChatEntry> {
    let count = rng.random_range(MIN_EMOTES..=MAX_EMOTES);
    (0..count)
        .map(|_| {
            let user = VIEWER_NAMES
                .choose(rng)
                .copied()
                .unwrap_or_default()
                .to_owned();
            let index = rng.random_range(1..=MAX_EMOTE_INDEX);
            ChatEntry::Emote { user, emote_url: emote_url(image_base_url, index) }
        })
        .collect()
}

/// User chats plus a fresh batch of emotes, in a uniformly random order.
pub fn compose<R: Rng + ?Sized>(
    rng: &mut R,
    user_chats: Vec<ChatEntry>,
    image_base_url: &str,
) -> Vec<ChatEntry> {
    let mut chats = user_chats;
    chats.extend(random_emotes(rng, image_base_url));
    chats.shuffle(rng);
    chats
}
