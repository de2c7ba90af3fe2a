//! Boilerplate generators for Unity Lua and C# sources

pub const RETRO_CLAIM_ANCHOR: &str = "---@Activity Retro Claim Anchor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    MonoBehaviour,
    ScriptableObject,
    Editor,
}

impl ScriptKind {
    pub const NAMES: [&'static str; 3] = ["MonoBehaviour", "ScriptableObject", "Editor"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "MonoBehaviour" => Some(Self::MonoBehaviour),
            "ScriptableObject" => Some(Self::ScriptableObject),
            "Editor" => Some(Self::Editor),
            _ => None,
        }
    }
}

pub fn lua_script(script_name: &str) -> String {
    format!("-- {script_name}.lua\n\n{RETRO_CLAIM_ANCHOR}\n")
}

pub fn retro_claim_function(activity_key: &str) -> String {
    format!(
        r#"-- Auto-generated retro claim for activity: {activity_key}
function ActivityRetroClaim_{activity_key}(player)
    -- the activity must be over and the player eligible
    local canClaim = CheckActivityStatus("{activity_key}", player)
    if not canClaim then
        return false, "retro claim conditions not met"
    end

    local rewards = GetActivityRewards("{activity_key}")
    GiveRewardsToPlayer(player, rewards)
    LogRetroClaim(player, "{activity_key}")

    return true, "retro claim granted"
end
"#
    )
}

/// Entry for the popup sequence table in `PopupSeqConfig.lua`.
pub fn popup_seq_config_entry(activity_key: &str) -> String {
    format!(
        r#"    {{
        --{activity_key}补领
        ["key"] = "{activity_key}CompensationView",
        ["daily"] = false,
        ["downloadKey"] = DlcNames.Base.PopTipView,
        ["func"] = PopupFunConfig.CheckPushNotReceiving{activity_key}RewardView,
        ["currentNeed"] = PopupFunConfig.need{activity_key}Reward,
    }},
"#
    )
}

/// Popup check functions for `PopupFunConfig.lua`.
pub fn popup_fun_config_entries(
    activity_key: &str,
    reward_type: &str,
    multiple_language_key: &str,
) -> String {
    format!(
        r#"-- {activity_key}补领弹窗
function PopupFunConfig.CheckPushNotReceiving{activity_key}RewardView(queueName)
    PopupFunConfig.CheckPushCommonNotReceivingRewardView("{activity_key}CompensationView", "{reward_type}", "{multiple_language_key}", queueName)
end

function PopupFunConfig.need{activity_key}Reward()
    return PopupFunConfig.NeedNotReceivingReward("{reward_type}")
end

"#
    )
}

pub fn csharp_script(name: &str, kind: ScriptKind, namespace: Option<&str>) -> String {
    let (usings, body) = match kind {
        ScriptKind::MonoBehaviour => (
            vec!["UnityEngine"],
            vec![
                format!("public class {name} : MonoBehaviour"),
                "{".to_string(),
                "    void Start()".to_string(),
                "    {".to_string(),
                "    }".to_string(),
                String::new(),
                "    void Update()".to_string(),
                "    {".to_string(),
                "    }".to_string(),
                "}".to_string(),
            ],
        ),
        ScriptKind::ScriptableObject => (
            vec!["UnityEngine"],
            vec![
                format!(
                    "[CreateAssetMenu(fileName = \"{name}\", menuName = \"ScriptableObjects/{name}\")]"
                ),
                format!("public class {name} : ScriptableObject"),
                "{".to_string(),
                "}".to_string(),
            ],
        ),
        ScriptKind::Editor => (
            vec!["UnityEditor", "UnityEngine"],
            vec![
                "[CustomEditor(typeof(MonoBehaviour))]".to_string(),
                format!("public class {name} : Editor"),
                "{".to_string(),
                "    public override void OnInspectorGUI()".to_string(),
                "    {".to_string(),
                "        base.OnInspectorGUI();".to_string(),
                "    }".to_string(),
                "}".to_string(),
            ],
        ),
    };

    let mut out = String::new();
    for using in usings {
        out.push_str(&format!("using {using};\n"));
    }
    out.push('\n');

    let indent = if namespace.is_some() { "    " } else { "" };
    if let Some(namespace) = namespace {
        out.push_str(&format!("namespace {namespace}\n{{\n"));
    }
    for line in body {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(&line);
        }
        out.push('\n');
    }
    if namespace.is_some() {
        out.push_str("}\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lua_script_carries_retro_claim_anchor() {
        let script = lua_script("Foo");
        assert!(script.starts_with("-- Foo.lua\n"));
        assert_eq!(script.matches(RETRO_CLAIM_ANCHOR).count(), 1);
    }

    #[test]
    fn popup_entries_reference_each_other() {
        let seq = popup_seq_config_entry("Summer");
        let fun = popup_fun_config_entries("Summer", "SummerReward", "SummerLang");

        assert!(seq.contains("PopupFunConfig.CheckPushNotReceivingSummerRewardView"));
        assert!(fun.contains("function PopupFunConfig.CheckPushNotReceivingSummerRewardView(queueName)"));
        assert!(seq.contains("PopupFunConfig.needSummerReward"));
        assert!(fun.contains("NeedNotReceivingReward(\"SummerReward\")"));
        assert!(fun.contains("\"SummerLang\""));
    }

    #[test]
    fn csharp_script_wraps_namespace() {
        let script = csharp_script("Player", ScriptKind::MonoBehaviour, Some("Game.Actors"));
        assert!(script.starts_with("using UnityEngine;\n\nnamespace Game.Actors\n{\n"));
        assert!(script.contains("    public class Player : MonoBehaviour\n"));
        assert!(script.ends_with("    }\n}\n"));
    }

    #[test]
    fn editor_script_without_namespace() {
        let script = csharp_script("PlayerInspector", ScriptKind::Editor, None);
        assert!(script.contains("using UnityEditor;\n"));
        assert!(script.contains("\npublic class PlayerInspector : Editor\n"));
        assert!(!script.contains("namespace"));
    }

    #[test]
    fn script_kind_parses_known_names_only() {
        for name in ScriptKind::NAMES {
            assert!(ScriptKind::parse(name).is_some());
        }
        assert_eq!(ScriptKind::parse("Component"), None);
    }
}
