//! Sample articles rendered by `--dummy`, for checking the sinks without
//! crawling.

use crate::models::{Article, ArticleCollection};

const SAMPLES: [(&str, &str, &str, &str, &str); 3] = [
    (
        "https://dummy.article.com/1",
        "تُرْكِيَا تَحْتَفِلُ بِفَتْحِ الْقُسْطَنْطِينِيَّةِ",
        "Turkey Celebrates the Conquest of Constantinople",
        "أَقَامَتْ تُرْكِيَا احْتِفَالًا كَبِيرًا لِإِحْيَاءِ الذِّكْرَى الْـ 562 لِفَتْحِ الْقُسْطَنْطِينِيَّةِ. وَقَدْ فَتَحَ الْعُثْمَانِيُّونَ هَذِهِ الْمَدِينَةَ عَامَ 1453م، وَصَارَ اسْمُهَا فِيمَا بَعْدُ إِسْطَنْبُولَ. طَيِّبُ أَرْدُوغَانَ، وَتَعَهَّدَ بِأَنْ يَظَلَّ صَوْتُ الْأَذَانِ يَتَرَدَّدُ فِي إِسْطَنْبُولَ إِلَى الْأَبَدِ. وَنِصْفُ مِلْيُونِ شَخْصٍ شَارَكُوا فِي هَذَا الْحَفْلِ، وَقَدْ حَضَرَهُ الرَّئِيسُ التُّرْكِيُّ رَجَبَ طَيِّبَ أَرْدُوغَانَ. وَقَالَتْ وَكَالَةُ الْأَنَاضُولِ إِنَّ نَحْوَ مِلْيُونِ شَخْصٍ حَضَرُوا الْحَفْلَ.",
        "Turkey held a large celebration to commemorate the 562nd anniversary of the conquest of Constantinople. The Ottomans conquered this city in 1453 AD, and its name later became Istanbul. Recep Tayyip Erdogan pledged that the call to prayer would continue to echo in Istanbul forever. Half a million people participated in this ceremony, which was attended by Turkish President Recep Tayyip Erdogan. Anadolu Agency stated that about one million people attended the ceremony.",
    ),
    (
        "https://dummy.article.com/2",
        "الْقَهْوَةُ الْعَرَبِيَّةُ: تَقْلِيدٌ وَضِيَافَةٌ",
        "Arabic Coffee: Tradition and Hospitality",
        "تُعَدُّ الْقَهْوَةُ الْعَرَبِيَّةُ جُزْءًا لَا يَتَجَزَّأُ مِنْ الثَّقَافَةِ وَالضِّيَافَةِ فِي الْعَالَمِ الْعَرَبِيِّ. تُقَدَّمُ فِي جَمِيعِ الْمُنَاسَبَاتِ، مِنْ الْاِحْتِفَالَاتِ إِلَى الْاِجْتِمَاعَاتِ الْعَائِلِيَّةِ. تُصْنَعُ مِنْ حُبُوبِ الْبُنِّ الْمَحْمَصَةِ بِشَكْلٍ خَفِيفٍ، وَتُضَافُ إِلَيْهَا الْهَيْلُ لِإِعْطَائِهَا نَكْهَةً مُمَيَّزَةً. تُقَدَّمُ فِي فَنَاجِينَ صَغِيرَةٍ بِدُونِ سُكَّرٍ، وَيُعْتَبَرُ تَقْدِيمُهَا دَلِيلًا عَلَى الْاِحْتِرَامِ وَالتَّقْدِيرِ لِلضَّيْفِ.",
        "Arabic coffee is an integral part of culture and hospitality in the Arab world. It is served on all occasions, from celebrations to family gatherings. It is made from lightly roasted coffee beans, with cardamom added to give it a distinctive flavor. It is served in small cups without sugar, and offering it is considered a sign of respect and appreciation for the guest.",
    ),
    (
        "https://dummy.article.com/3",
        "أَهَمِّيَّةُ اللُّغَةِ الْعَرَبِيَّةِ فِي الْعَصْرِ الْحَدِيثِ",
        "The Importance of the Arabic Language in the Modern Era",
        "تَلْعَبُ اللُّغَةُ الْعَرَبِيَّةُ دَوْرًا حَيَوِيًّا فِي الْعَصْرِ الْحَدِيثِ، فَهِيَ لُغَةُ الْقُرْآنِ الْكَرِيمِ وَلُغَةُ مَلَايِينِ النَّاطِقِينَ بِهَا حَوْلَ الْعَالَمِ. لَيْسَتْ مُجَرَّدَ وَسِيلَةٍ لِلتَّوَاصُلِ، بَلْ هِيَ حَامِلَةٌ لِتَارِيخٍ وَثَقَافَةٍ غَنِيَّةٍ. فِي ظِلِّ الْعَوْلَمَةِ، يَزْدَادُ الْاِهْتِمَامُ بِتَعَلُّمِ اللُّغَةِ الْعَرَبِيَّةِ لِأَغْرَاضٍ تِجَارِيَّةٍ وَدِبْلُومَاسِيَّةٍ وَثَقَافِيَّةٍ، مِمَّا يُعَزِّزُ مَكَانَتَهَا كَلُغَةٍ عَالَمِيَّةٍ مُهِمَّةٍ.",
        "The Arabic language plays a vital role in the modern era, as it is the language of the Holy Quran and the language of millions of speakers around the world. It is not just a means of communication, but it carries a rich history and culture. In the context of globalization, interest in learning Arabic is increasing for commercial, diplomatic, and cultural purposes, which enhances its position as an important global language.",
    ),
];

pub fn dummy_articles() -> ArticleCollection {
    SAMPLES
        .iter()
        .map(|(url, title, title_english, content, content_english)| {
            (
                url.to_string(),
                Article {
                    title: title.to_string(),
                    title_english: title_english.to_string(),
                    content: content.to_string(),
                    content_english: content_english.to_string(),
                },
            )
        })
        .collect()
}
