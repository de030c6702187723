//! Static Hanzi dataset.
//!
//! Pinyin is stored with tone marks (the form shown to learners); comparison folds
//! tones away, see [`crate::pinyin`]. Ids are assigned from position, starting at 1.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One Hanzi with its canonical pinyin.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub character: String,
    pub pinyin: String,
}

impl Character {
    pub fn new(id: u32, character: &str, pinyin: &str) -> Self {
        Self {
            id,
            character: character.to_string(),
            pinyin: pinyin.to_string(),
        }
    }
}

pub const CHARACTER_DATA: &[(&str, &str)] = &[
    ("一", "yī"), ("二", "èr"), ("三", "sān"), ("四", "sì"), ("五", "wǔ"),
    ("六", "liù"), ("七", "qī"), ("八", "bā"), ("九", "jiǔ"), ("十", "shí"),
    ("人", "rén"), ("大", "dà"), ("小", "xiǎo"), ("上", "shàng"), ("下", "xià"),
    ("中", "zhōng"), ("国", "guó"), ("日", "rì"), ("月", "yuè"), ("水", "shuǐ"),
    ("火", "huǒ"), ("山", "shān"), ("木", "mù"), ("土", "tǔ"), ("口", "kǒu"),
    ("手", "shǒu"), ("心", "xīn"), ("目", "mù"), ("耳", "ěr"), ("足", "zú"),
    ("天", "tiān"), ("地", "dì"), ("风", "fēng"), ("雨", "yǔ"), ("云", "yún"),
    ("花", "huā"), ("草", "cǎo"), ("鱼", "yú"), ("鸟", "niǎo"), ("马", "mǎ"),
    ("牛", "niú"), ("羊", "yáng"), ("狗", "gǒu"), ("猫", "māo"), ("虫", "chóng"),
    ("米", "mǐ"), ("饭", "fàn"), ("茶", "chá"), ("你", "nǐ"), ("我", "wǒ"),
    ("他", "tā"), ("她", "tā"), ("好", "hǎo"), ("是", "shì"), ("不", "bù"),
    ("有", "yǒu"), ("在", "zài"), ("来", "lái"), ("去", "qù"), ("吃", "chī"),
    ("喝", "hē"), ("看", "kàn"), ("听", "tīng"), ("说", "shuō"), ("学", "xué"),
    ("写", "xiě"), ("走", "zǒu"), ("飞", "fēi"), ("开", "kāi"), ("关", "guān"),
    ("门", "mén"), ("书", "shū"), ("车", "chē"), ("家", "jiā"), ("爸", "bà"),
    ("妈", "mā"), ("哥", "gē"), ("姐", "jiě"), ("弟", "dì"), ("妹", "mèi"),
    ("红", "hóng"), ("白", "bái"), ("黑", "hēi"), ("绿", "lǜ"), ("黄", "huáng"),
    ("蓝", "lán"), ("多", "duō"), ("少", "shǎo"), ("长", "cháng"), ("高", "gāo"),
    ("左", "zuǒ"), ("右", "yòu"), ("前", "qián"), ("后", "hòu"), ("里", "lǐ"),
    ("外", "wài"), ("年", "nián"), ("星", "xīng"), ("电", "diàn"), ("石", "shí"),
    ("田", "tián"), ("力", "lì"), ("工", "gōng"), ("王", "wáng"), ("女", "nǚ"),
    ("子", "zǐ"), ("生", "shēng"), ("爱", "ài"), ("笑", "xiào"), ("哭", "kū"),
    ("朋", "péng"), ("友", "yǒu"), ("字", "zì"), ("明", "míng"), ("早", "zǎo"),
    ("晚", "wǎn"), ("冷", "lěng"), ("热", "rè"), ("快", "kuài"), ("慢", "màn"),
];

/// The full character pool, built once.
pub fn character_pool() -> &'static [Character] {
    static POOL: OnceLock<Vec<Character>> = OnceLock::new();
    POOL.get_or_init(|| {
        CHARACTER_DATA
            .iter()
            .enumerate()
            .map(|(i, (hanzi, pinyin))| Character::new(i as u32 + 1, hanzi, pinyin))
            .collect()
    })
}
