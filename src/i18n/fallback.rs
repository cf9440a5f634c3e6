//! Built-in dictionaries used when a language file can neither be fetched
//! nor read from the cache. They only cover the chrome every page needs.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::i18n::{Dictionary, Language};

static ENGLISH: Lazy<Value> = Lazy::new(|| {
    json!({
        "site": { "name": "Vientiane Build Consult" },
        "nav": {
            "home": "Home",
            "about": "About",
            "projects": "Projects",
            "contact": "Contact",
            "menu": "Menu",
            "label": "Main navigation"
        },
        "footer": {
            "tagline": "Engineering and construction consulting in Laos",
            "copyright": "All rights reserved."
        },
        "errors": {
            "generic": "Some features may not work right now. Please refresh the page."
        },
        "projects": {
            "error": {
                "load": "Projects could not be loaded.",
                "retry": "Try again"
            },
            "empty": "No projects to show yet."
        }
    })
});

static LAO: Lazy<Value> = Lazy::new(|| {
    json!({
        "site": { "name": "ວຽງຈັນ ບິວ ຄອນຊັນ" },
        "nav": {
            "home": "ໜ້າຫຼັກ",
            "about": "ກ່ຽວກັບພວກເຮົາ",
            "projects": "ໂຄງການ",
            "contact": "ຕິດຕໍ່",
            "menu": "ເມນູ",
            "label": "ເມນູຫຼັກ"
        },
        "footer": {
            "tagline": "ທີ່ປຶກສາດ້ານວິສະວະກຳ ແລະ ການກໍ່ສ້າງໃນລາວ",
            "copyright": "ສະຫງວນລິຂະສິດ."
        },
        "errors": {
            "generic": "ບາງຄຸນສົມບັດອາດໃຊ້ງານບໍ່ໄດ້. ກະລຸນາໂຫຼດໜ້ານີ້ຄືນໃໝ່."
        },
        "projects": {
            "error": {
                "load": "ບໍ່ສາມາດໂຫຼດໂຄງການໄດ້.",
                "retry": "ລອງໃໝ່"
            },
            "empty": "ຍັງບໍ່ມີໂຄງການ."
        }
    })
});

/// The built-in dictionary for `language`.
pub fn builtin_dictionary(language: Language) -> Dictionary {
    let tree = match language {
        Language::English => &*ENGLISH,
        Language::Lao => &*LAO,
    };
    Dictionary::new(tree.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dictionaries_cover_the_same_keys() {
        let mut en = builtin_dictionary(Language::English).leaf_keys();
        let mut lo = builtin_dictionary(Language::Lao).leaf_keys();
        en.sort();
        lo.sort();
        assert_eq!(en, lo);
        assert!(en.contains(&"nav.home".to_string()));
    }
}
